//! Outbound events produced by the use case layer.
//!
//! The infrastructure layer turns these into wire frames; the domain does not
//! know about JSON.

use std::collections::BTreeMap;

use super::{
    entity::{ChatMessage, PresenceEntry},
    value_object::{MessageContent, Photo, RoomName, Username},
};

/// Event delivered from the server to one or more connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    AuthSuccess { username: Username, photo: Photo },
    AuthFail { reason: String },
    /// Full presence mapping after a change
    UsersUpdate(BTreeMap<Username, PresenceEntry>),
    UserJoined { username: Username },
    /// Public room history, oldest first
    ChatHistory(Vec<ChatMessage>),
    ChatMessage {
        sender: Username,
        content: MessageContent,
        photo: Photo,
    },
    Typing { name: Username, room: RoomName },
    ClearMessages,
    Error { reason: String },
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::AuthSuccess { .. } => "auth-success",
            ServerEvent::AuthFail { .. } => "auth-fail",
            ServerEvent::UsersUpdate(_) => "users-update",
            ServerEvent::UserJoined { .. } => "user-joined",
            ServerEvent::ChatHistory(_) => "chat-history",
            ServerEvent::ChatMessage { .. } => "chat-message",
            ServerEvent::Typing { .. } => "typing",
            ServerEvent::ClearMessages => "clearMessages",
            ServerEvent::Error { .. } => "error",
        }
    }
}
