//! UseCase: 認証（サインアップ・ログイン）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthUseCase::signup() / AuthUseCase::login()
//!
//! ### なぜこのテストが必要か
//! - 資格情報がハッシュ化されて保存されることを保証
//! - 重複ユーザー名・誤ったパスワードが区別なく正しく拒否されることを確認
//! - Repository 障害が PersistenceError として返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：サインアップ後のログイン
//! - 異常系：重複サインアップ、誤ったパスワード、存在しないユーザー
//! - 異常系：Repository の障害

use std::sync::Arc;

use crate::domain::{Password, PasswordHasher, Photo, User, UserRepository, Username};

use super::error::AuthError;

/// Result of a successful signup or login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: Username,
    pub photo: Photo,
}

/// 認証のユースケース
///
/// Neither operation touches presence: registering for chat is a separate,
/// explicit step.
pub struct AuthUseCase {
    /// Repository（ユーザー情報の永続化の抽象化）
    user_repository: Arc<dyn UserRepository>,
    /// PasswordHasher（パスワードハッシュの抽象化）
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AuthUseCase {
    /// 新しい AuthUseCase を作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    /// サインアップを実行
    ///
    /// The password is stored only as a bcrypt hash.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedUser)` - 登録成功
    /// * `Err(AuthError::DuplicateUsername)` - ユーザー名が既に存在する
    /// * `Err(AuthError::Persistence)` - Repository 障害
    pub async fn signup(
        &self,
        username: Username,
        password: Password,
        photo: Photo,
    ) -> Result<AuthenticatedUser, AuthError> {
        // 1. 重複チェック（ハッシュ計算の前に安価に弾く）
        if self
            .user_repository
            .find_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername(username.into_string()));
        }

        // 2. パスワードをハッシュ化
        let password_hash = self.password_hasher.hash(&password).await?;

        // 3. 保存（同時サインアップは Repository 側で弾かれる）
        self.user_repository
            .insert(User::new(username.clone(), password_hash, photo.clone()))
            .await?;

        tracing::info!("User '{}' signed up", username);
        Ok(AuthenticatedUser { username, photo })
    }

    /// ログインを実行
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedUser)` - 認証成功（保存されている photo を返す）
    /// * `Err(AuthError::InvalidCredentials)` - ユーザーが存在しない、またはパスワード不一致
    /// * `Err(AuthError::Persistence)` - Repository 障害
    pub async fn login(
        &self,
        username: Username,
        password: Password,
    ) -> Result<AuthenticatedUser, AuthError> {
        let Some(user) = self.user_repository.find_by_username(&username).await? else {
            tracing::debug!("Login failed for '{}': no such user", username);
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(&password, &user.password_hash)
            .await?
        {
            tracing::debug!("Login failed for '{}': password mismatch", username);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User '{}' logged in", username);
        Ok(AuthenticatedUser {
            username: user.username,
            photo: user.photo,
        })
    }
}
