//! Shared utilities for Engawa packages.

pub mod logger;
pub mod time;
