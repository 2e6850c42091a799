//! Infrastructure layer.
//!
//! Concrete implementations of the domain traits plus wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod password;
pub mod repository;
