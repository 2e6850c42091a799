//! Engawa multi-room chat server library.
//!
//! Coordinates authentication, presence, room membership and room-scoped
//! broadcast for WebSocket clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
