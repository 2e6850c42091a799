//! WebSocket frame DTOs.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.
//! Payload-less events (`clearMessages` outbound) omit `data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ========================================
// Client → Server
// ========================================

/// Inbound frame
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    Signup(SignupPayload),
    Login(LoginPayload),
    RegisterUser(RegisterUserPayload),
    JoinRoom(JoinRoomPayload),
    ChatMessage(ChatMessagePayload),
    Typing(TypingPayload),
    #[serde(rename = "clearMessages")]
    ClearMessages(ClearMessagesPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupPayload {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub photo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterUserPayload {
    pub username: String,
    #[serde(default)]
    pub photo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinRoomPayload {
    pub room: String,
    /// Display name of the joining user (informational)
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessagePayload {
    pub room: String,
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    pub room: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClearMessagesPayload {
    pub token: String,
}

// ========================================
// Server → Client
// ========================================

/// Outbound frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    AuthSuccess(AuthSuccessPayload),
    AuthFail(ReasonPayload),
    UsersUpdate(BTreeMap<String, PresenceInfo>),
    UserJoined(UserJoinedPayload),
    ChatHistory(Vec<HistoryMessage>),
    ChatMessage(ChatBroadcastPayload),
    Typing(TypingPayload),
    #[serde(rename = "clearMessages")]
    ClearMessages,
    Error(ReasonPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSuccessPayload {
    pub username: String,
    pub photo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonPayload {
    pub reason: String,
}

/// Presence mapping value: `{ username: { id, photo } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceInfo {
    pub id: String,
    pub photo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserJoinedPayload {
    pub username: String,
}

/// Stored message as replayed in `chat-history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    pub room: String,
    pub sender: String,
    pub content: String,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatBroadcastPayload {
    pub sender: String,
    pub content: String,
    pub photo: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_register_user_frame() {
        // テスト項目: register-user フレームを解析できる（photo は省略可）
        // given (前提条件):
        let text = r#"{"event":"register-user","data":{"username":"alice"}}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::RegisterUser(RegisterUserPayload {
                username: "alice".to_string(),
                photo: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_clear_messages_frame() {
        // テスト項目: clearMessages はキャメルケースのイベント名で受け付ける
        let text = r#"{"event":"clearMessages","data":{"token":"t"}}"#;
        let msg: ClientMessage = serde_json::from_str(text).unwrap();
        assert_eq!(
            msg,
            ClientMessage::ClearMessages(ClearMessagesPayload {
                token: "t".to_string()
            })
        );
    }

    #[test]
    fn test_parse_missing_field_fails() {
        // テスト項目: 必須フィールドが欠けたフレームは解析エラーになる
        let text = r#"{"event":"chat-message","data":{"room":"lobby","content":"hi"}}"#;
        assert!(serde_json::from_str::<ClientMessage>(text).is_err());
    }

    #[test]
    fn test_parse_unknown_event_fails() {
        // テスト項目: 未知のイベント名は解析エラーになる
        let text = r#"{"event":"dance","data":{}}"#;
        assert!(serde_json::from_str::<ClientMessage>(text).is_err());
    }

    #[test]
    fn test_serialize_chat_message_frame() {
        // テスト項目: chat-message フレームの JSON 形状
        // given (前提条件):
        let msg = ServerMessage::ChatMessage(ChatBroadcastPayload {
            sender: "alice".to_string(),
            content: "hi".to_string(),
            photo: "a.png".to_string(),
        });

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "event": "chat-message",
                "data": {"sender": "alice", "content": "hi", "photo": "a.png"}
            })
        );
    }

    #[test]
    fn test_serialize_clear_messages_frame_has_no_data() {
        // テスト項目: clearMessages フレームは data を持たない
        let value = serde_json::to_value(&ServerMessage::ClearMessages).unwrap();
        assert_eq!(value, json!({"event": "clearMessages"}));
    }

    #[test]
    fn test_serialize_history_message_uses_camel_case() {
        // テスト項目: 履歴メッセージは isPrivate をキャメルケースで出力する
        let msg = ServerMessage::ChatHistory(vec![HistoryMessage {
            room: "lobby".to_string(),
            sender: "alice".to_string(),
            content: "hi".to_string(),
            timestamp: 1000,
            is_private: false,
        }]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["event"], "chat-history");
        assert_eq!(value["data"][0]["isPrivate"], false);
        assert_eq!(value["data"][0]["timestamp"], 1000);
    }
}
