//! Domain entities.

mod membership;
mod message;
mod presence;
mod user;

pub use membership::{HeldMessage, RoomMembership};
pub use message::{ChatMessage, Visibility};
pub use presence::{PresenceEntry, PresenceRegistry};
pub use user::User;
