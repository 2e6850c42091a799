//! UseCase: 全メッセージ削除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ClearMessagesUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 管理者トークンなしでは削除できないことを保証
//! - 削除後に全接続へ clearMessages が届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：正しいトークンでの削除
//! - 異常系：誤ったトークン、トークン未設定のサーバー
//! - 異常系：Repository の障害（通知しない）

use std::sync::Arc;

use crate::domain::{AdminToken, MessageRepository, ServerEvent};

use super::{BroadcastEngine, error::ClearMessagesError};

/// 全メッセージ削除のユースケース
pub struct ClearMessagesUseCase {
    /// Repository（メッセージ永続化の抽象化）
    message_repository: Arc<dyn MessageRepository>,
    broadcast: Arc<BroadcastEngine>,
    /// `None` disables the operation entirely
    admin_token: Option<AdminToken>,
}

impl ClearMessagesUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        broadcast: Arc<BroadcastEngine>,
        admin_token: Option<AdminToken>,
    ) -> Self {
        Self {
            message_repository,
            broadcast,
            admin_token,
        }
    }

    /// Delete every stored message and tell all connections
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 削除成功（clearMessages を全接続に送信済み）
    /// * `Err(ClearMessagesError::Disabled)` - 管理者トークンが未設定
    /// * `Err(ClearMessagesError::Unauthorized)` - トークン不一致
    /// * `Err(ClearMessagesError::Persistence)` - 削除失敗（通知しない）
    pub async fn execute(&self, token: Option<&str>) -> Result<(), ClearMessagesError> {
        let Some(admin_token) = &self.admin_token else {
            return Err(ClearMessagesError::Disabled);
        };
        if !token.is_some_and(|candidate| admin_token.verify(candidate)) {
            tracing::warn!("Rejected clear-messages request with invalid admin token");
            return Err(ClearMessagesError::Unauthorized);
        }

        self.message_repository
            .clear_all()
            .await
            .map_err(|e| ClearMessagesError::Persistence(e.to_string()))?;

        match self
            .broadcast
            .publish_global(&ServerEvent::ClearMessages)
            .await
        {
            Ok(report) => tracing::info!(
                "All messages cleared, notified {} connection(s)",
                report.delivered_count()
            ),
            Err(e) => tracing::error!("All messages cleared, but notification failed: {}", e),
        }
        Ok(())
    }
}
