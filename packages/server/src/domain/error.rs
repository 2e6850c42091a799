//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// A required field was empty
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A field exceeded its maximum length (in characters)
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A field contained characters it may not contain
    #[error("{0} contains invalid characters")]
    InvalidCharacter(&'static str),
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A user with the same username is already stored
    #[error("User '{0}' already exists")]
    UserAlreadyExists(String),

    /// The backing store could not serve the request
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// MessagePusher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The target connection is not registered
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    /// The target connection's channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The event could not be encoded for the wire
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// Password hashing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    #[error("hash error: {0}")]
    Hash(String),

    #[error("verify error: {0}")]
    Verify(String),
}
