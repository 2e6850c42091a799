//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（通知）のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// Outbound channel of one connection (encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Result of a fan-out
///
/// Per-recipient failures are collected here instead of aborting the
/// broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: Vec<ConnectionId>,
    pub failed: Vec<ConnectionId>,
}

impl DeliveryReport {
    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }
}

/// MessagePusher trait
///
/// Fan-out primitive used by the use case layer. Implementations must isolate
/// per-recipient failures in `broadcast` / `broadcast_all`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 指定した接続群にイベントを送信
    ///
    /// Only fails if the event cannot be encoded at all.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<DeliveryReport, MessagePushError>;

    /// 接続中の全ての接続にイベントを送信
    async fn broadcast_all(&self, event: &ServerEvent) -> Result<DeliveryReport, MessagePushError>;
}
