//! Conversion logic between DTOs and domain types.

use std::collections::BTreeMap;

use crate::domain::{ChatMessage, PresenceEntry, ServerEvent, Username};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for dto::HistoryMessage {
    fn from(model: ChatMessage) -> Self {
        Self {
            room: model.room.into_string(),
            sender: model.sender.into_string(),
            content: model.content.into_string(),
            timestamp: model.timestamp.value(),
            is_private: model.visibility.is_private(),
        }
    }
}

/// Presence snapshot → `{ username: { id, photo } }`
pub fn presence_to_dto(
    snapshot: BTreeMap<Username, PresenceEntry>,
) -> BTreeMap<String, dto::PresenceInfo> {
    snapshot
        .into_iter()
        .map(|(username, entry)| {
            (
                username.into_string(),
                dto::PresenceInfo {
                    id: entry.connection_id.to_string(),
                    photo: entry.photo.into_string(),
                },
            )
        })
        .collect()
}

impl From<ServerEvent> for dto::ServerMessage {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::AuthSuccess { username, photo } => {
                Self::AuthSuccess(dto::AuthSuccessPayload {
                    username: username.into_string(),
                    photo: photo.into_string(),
                })
            }
            ServerEvent::AuthFail { reason } => Self::AuthFail(dto::ReasonPayload { reason }),
            ServerEvent::UsersUpdate(snapshot) => Self::UsersUpdate(presence_to_dto(snapshot)),
            ServerEvent::UserJoined { username } => Self::UserJoined(dto::UserJoinedPayload {
                username: username.into_string(),
            }),
            ServerEvent::ChatHistory(messages) => {
                Self::ChatHistory(messages.into_iter().map(Into::into).collect())
            }
            ServerEvent::ChatMessage {
                sender,
                content,
                photo,
            } => Self::ChatMessage(dto::ChatBroadcastPayload {
                sender: sender.into_string(),
                content: content.into_string(),
                photo: photo.into_string(),
            }),
            ServerEvent::Typing { name, room } => Self::Typing(dto::TypingPayload {
                room: room.into_string(),
                name: name.into_string(),
            }),
            ServerEvent::ClearMessages => Self::ClearMessages,
            ServerEvent::Error { reason } => Self::Error(dto::ReasonPayload { reason }),
        }
    }
}

/// Encode an event as a wire frame
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerMessage::from(event.clone()))
}
