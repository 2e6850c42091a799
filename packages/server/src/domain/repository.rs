//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatMessage, MessageContent, RepositoryError, RoomName, User, Username, Visibility,
};

/// Message Repository trait
///
/// Durable append/query of chat messages. Timestamps are assigned by the
/// repository and never decrease across appends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追加し、タイムスタンプ付きのメッセージを返す
    async fn append(
        &self,
        room: RoomName,
        sender: Username,
        content: MessageContent,
        visibility: Visibility,
    ) -> Result<ChatMessage, RepositoryError>;

    /// ルームの履歴をタイムスタンプ昇順で取得
    async fn history(
        &self,
        room: &RoomName,
        visibility: Visibility,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// 全ルームの全メッセージを削除
    async fn clear_all(&self) -> Result<(), RepositoryError>;
}

/// User Repository trait
///
/// Credential/profile storage keyed by username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを取得
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;

    /// ユーザーを追加
    ///
    /// Fails with `RepositoryError::UserAlreadyExists` if the username is taken.
    async fn insert(&self, user: User) -> Result<(), RepositoryError>;
}
