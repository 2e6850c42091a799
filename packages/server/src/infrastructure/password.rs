//! bcrypt を使った PasswordHasher 実装
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::domain::{Password, PasswordHash, PasswordHashError, PasswordHasher};

#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(DEFAULT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(Some(DEFAULT_COST))
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let cost = self.cost;
        let plaintext = password.expose().to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(plaintext, cost))
            .await
            .map_err(|err| PasswordHashError::Hash(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHashError::Hash(err.to_string())))?;

        PasswordHash::new(hashed).map_err(|err| PasswordHashError::Hash(err.to_string()))
    }

    async fn verify(
        &self,
        password: &Password,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let plaintext = password.expose().to_owned();
        let hashed = hashed.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify(plaintext, &hashed))
            .await
            .map_err(|err| PasswordHashError::Verify(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHashError::Verify(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt の最小コスト（テスト高速化のため）
    const TEST_COST: u32 = 4;

    fn password(value: &str) -> Password {
        Password::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_hash_is_not_plaintext_and_verifies() {
        // テスト項目: ハッシュ値は平文と異なり、同じパスワードで検証に成功する
        // given (前提条件):
        let hasher = BcryptPasswordHasher::new(Some(TEST_COST));

        // when (操作):
        let hashed = hasher.hash(&password("pw1")).await.unwrap();

        // then (期待する結果):
        assert_ne!(hashed.as_str(), "pw1");
        assert!(hashed.as_str().starts_with("$2"));
        assert!(hasher.verify(&password("pw1"), &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_wrong_password() {
        // テスト項目: 異なるパスワードは検証に失敗する
        let hasher = BcryptPasswordHasher::new(Some(TEST_COST));
        let hashed = hasher.hash(&password("pw1")).await.unwrap();
        assert!(!hasher.verify(&password("wrongpw"), &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_malformed_hash_is_error() {
        // テスト項目: 不正な形式のハッシュはエラーになる
        let hasher = BcryptPasswordHasher::new(Some(TEST_COST));
        let malformed = PasswordHash::new("not-a-bcrypt-hash".to_string()).unwrap();
        let result = hasher.verify(&password("pw1"), &malformed).await;
        assert!(matches!(result, Err(PasswordHashError::Verify(_))));
    }

    #[test]
    fn test_default_cost() {
        // テスト項目: コスト未指定時は bcrypt の DEFAULT_COST を使う
        assert_eq!(BcryptPasswordHasher::new(None).cost(), DEFAULT_COST);
    }
}
