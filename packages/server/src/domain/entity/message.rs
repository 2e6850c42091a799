//! Chat message entity.

use crate::domain::value_object::{MessageContent, RoomName, Timestamp, Username};

/// Whether a message appears in public room history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(&self) -> bool {
        matches!(self, Visibility::Private)
    }
}

/// Persisted chat message
///
/// The timestamp is assigned by the message repository on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room: RoomName,
    pub sender: Username,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    pub visibility: Visibility,
}

impl ChatMessage {
    pub fn new(
        room: RoomName,
        sender: Username,
        content: MessageContent,
        timestamp: Timestamp,
        visibility: Visibility,
    ) -> Self {
        Self {
            room,
            sender,
            content,
            timestamp,
            visibility,
        }
    }
}
