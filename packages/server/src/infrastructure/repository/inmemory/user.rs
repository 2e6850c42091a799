//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, User, UserRepository, Username};

/// インメモリ User Repository 実装
///
/// The existence check and the insert happen under one lock, so two
/// concurrent signups for the same username cannot both succeed.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Username, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::UserAlreadyExists(
                user.username.into_string(),
            ));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }
}
