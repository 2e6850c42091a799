//! Use case error types.

use thiserror::Error;

use crate::domain::{MessagePushError, PasswordHashError, RepositoryError};

/// Auth errors
///
/// `InvalidCredentials` covers both an unknown username and a wrong password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::UserAlreadyExists(username) => AuthError::DuplicateUsername(username),
            other => AuthError::Persistence(other.to_string()),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(e: PasswordHashError) -> Self {
        AuthError::Hashing(e.to_string())
    }
}

/// Presence registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterUserError {
    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

impl From<MessagePushError> for RegisterUserError {
    fn from(e: MessagePushError) -> Self {
        RegisterUserError::BroadcastFailed(e.to_string())
    }
}

/// Room join errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Failed to deliver history: {0}")]
    DeliveryFailed(String),
}

/// Publish errors (reported to the sender only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// Clear-all-messages errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClearMessagesError {
    /// No admin token is configured on this server
    #[error("Clearing messages is disabled")]
    Disabled,

    #[error("Invalid admin token")]
    Unauthorized,

    #[error("Persistence error: {0}")]
    Persistence(String),
}
