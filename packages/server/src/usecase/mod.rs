//! Use case layer.
//!
//! Coordination logic over the domain traits. Presence and room membership
//! are shared, lock-guarded registries created once at startup and injected
//! into the use cases that need them.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{PresenceRegistry, RoomMembership};

pub mod auth;
pub mod broadcast;
pub mod clear_messages;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod presence;
pub mod room;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthUseCase, AuthenticatedUser};
pub use broadcast::BroadcastEngine;
pub use clear_messages::ClearMessagesUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{AuthError, ClearMessagesError, JoinRoomError, PublishError, RegisterUserError};
pub use presence::PresenceUseCase;
pub use room::RoomUseCase;

/// Presence registry shared between use cases
pub type SharedPresence = Arc<Mutex<PresenceRegistry>>;

/// Room membership shared between use cases
pub type SharedMembership = Arc<Mutex<RoomMembership>>;

pub fn new_shared_presence() -> SharedPresence {
    Arc::new(Mutex::new(PresenceRegistry::new()))
}

pub fn new_shared_membership() -> SharedMembership {
    Arc::new(Mutex::new(RoomMembership::new()))
}
