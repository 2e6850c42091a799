//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{clear_messages, health_check, presence, signup};
pub use websocket::websocket_handler;
