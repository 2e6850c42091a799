//! InMemory repository implementations.
//!
//! Process-local stores. Data does not survive a restart.

mod message;
mod user;

pub use message::InMemoryMessageRepository;
pub use user::InMemoryUserRepository;
