//! User entity.

use crate::domain::value_object::{PasswordHash, Photo, Username};

/// Registered user with hashed credential
///
/// Created at signup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    pub password_hash: PasswordHash,
    pub photo: Photo,
}

impl User {
    pub fn new(username: Username, password_hash: PasswordHash, photo: Photo) -> Self {
        Self {
            username,
            password_hash,
            photo,
        }
    }
}
