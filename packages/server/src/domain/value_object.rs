//! Value objects.
//!
//! Every value that crosses the wire is validated here once, so the use case
//! layer only ever sees well-formed data.

use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::error::ValueObjectError;

pub const PASSWORD_MAX_CHARS: usize = 128;
pub const ROOM_NAME_MAX_CHARS: usize = 64;
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 2000;

fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValueObjectError::TooLong { field, max });
    }
    Ok(())
}

/// Identity of one accepted transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh, random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username (unique user key)
///
/// Surrounding whitespace is trimmed. Inner spaces are kept as typed
/// (`"John Doe"`); control characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("username"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValueObjectError::InvalidCharacter("username"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password as supplied by a client
///
/// Never logged: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        check_length("password", &value, PASSWORD_MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// One-way hashed password credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("password hash"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Profile image (opaque text, typically a base64 data URL)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Photo(String);

impl Photo {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Room key chosen by clients
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        check_length("room", &value, ROOM_NAME_MAX_CHARS)?;
        if value.chars().any(char::is_control) {
            return Err(ValueObjectError::InvalidCharacter("room"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("content"));
        }
        check_length("content", &value, MESSAGE_CONTENT_MAX_CHARS)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Shared secret that gates the clear-all-messages capability
///
/// Only the SHA-256 digest is kept; candidates are compared digest against
/// digest without early exit.
#[derive(Clone)]
pub struct AdminToken {
    digest: [u8; 32],
}

impl AdminToken {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("admin token"));
        }
        Ok(Self {
            digest: Sha256::digest(value.as_bytes()).into(),
        })
    }

    /// Check `candidate` against the configured token in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        // テスト項目: 前後の空白が取り除かれる
        // given (前提条件):
        let raw = "  alice ".to_string();

        // when (操作):
        let username = Username::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_username_keeps_inner_spaces() {
        // テスト項目: 内部に空白を含む表示名はそのまま受け付ける
        // given (前提条件):
        let raw = " John Doe ".to_string();

        // when (操作):
        let username = Username::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(username.as_str(), "John Doe");
    }

    #[test]
    fn test_username_rejects_empty_and_control_characters() {
        // テスト項目: 空文字列・制御文字を含むユーザー名は拒否される
        assert_eq!(
            Username::new("   ".to_string()),
            Err(ValueObjectError::Empty("username"))
        );
        assert_eq!(
            Username::new("al\u{0007}ice".to_string()),
            Err(ValueObjectError::InvalidCharacter("username"))
        );
        assert_eq!(
            Username::new("al\tice".to_string()),
            Err(ValueObjectError::InvalidCharacter("username"))
        );
    }

    #[test]
    fn test_username_accepts_long_display_name() {
        // テスト項目: 長い表示名も受け付ける
        let raw = "a".repeat(100);
        assert_eq!(Username::new(raw.clone()).unwrap().as_str(), raw);
    }

    #[test]
    fn test_password_debug_is_redacted() {
        // テスト項目: パスワードは Debug 出力に現れない
        let password = Password::new("hunter2".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter2"));
    }

    #[test]
    fn test_room_name_rejects_control_characters() {
        // テスト項目: 制御文字を含むルーム名は拒否される
        assert!(RoomName::new("lobby".to_string()).is_ok());
        assert_eq!(
            RoomName::new("lob\nby".to_string()),
            Err(ValueObjectError::InvalidCharacter("room"))
        );
        assert_eq!(
            RoomName::new(String::new()),
            Err(ValueObjectError::Empty("room"))
        );
    }

    #[test]
    fn test_message_content_rejects_blank() {
        // テスト項目: 空白のみのメッセージは拒否される
        assert_eq!(
            MessageContent::new("  \n ".to_string()),
            Err(ValueObjectError::Empty("content"))
        );
        assert!(MessageContent::new(" hi ".to_string()).is_ok());
    }

    #[test]
    fn test_admin_token_verify() {
        // テスト項目: 管理トークンは一致する場合のみ検証に成功する
        // given (前提条件):
        let token = AdminToken::new("s3cret").unwrap();

        // then (期待する結果):
        assert!(token.verify("s3cret"));
        assert!(!token.verify("s3cre"));
        assert!(!token.verify(""));
    }
}
