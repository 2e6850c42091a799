//! Password hashing port.

use async_trait::async_trait;

use super::{Password, PasswordHash, PasswordHashError};

/// One-way password hashing
///
/// `verify` must compare in constant time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    async fn verify(
        &self,
        password: &Password,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}
