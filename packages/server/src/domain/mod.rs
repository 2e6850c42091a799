//! Domain layer for the chat server.
//!
//! Entities, value objects and the traits the use case layer depends on.
//! Concrete implementations of the traits live in the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod password;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, HeldMessage, PresenceEntry, PresenceRegistry, RoomMembership, User, Visibility,
};
pub use error::{MessagePushError, PasswordHashError, RepositoryError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{DeliveryReport, MessagePusher, PusherChannel};
pub use password::PasswordHasher;
pub use repository::{MessageRepository, UserRepository};
pub use value_object::{
    AdminToken, ConnectionId, MessageContent, Password, PasswordHash, Photo, RoomName, Timestamp,
    Username,
};
