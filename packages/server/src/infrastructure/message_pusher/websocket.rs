//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `ServerEvent` をフレームにエンコードし、接続へ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの enqueue のみで、ソケットへの書き込みは接続ごとの
//! 書き込みタスクが行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, DeliveryReport, MessagePushError, MessagePusher, PusherChannel, ServerEvent,
    },
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.push_to(&connection_id, &ServerEvent::ClearMessages).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続中のクライアント数
    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    /// Send `frame` to each target, collecting per-recipient outcomes
    fn deliver(
        clients: &HashMap<ConnectionId, PusherChannel>,
        targets: impl IntoIterator<Item = ConnectionId>,
        frame: &str,
        event_name: &str,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // ブロードキャストでは一部の送信失敗を許容
                    if let Err(e) = sender.send(frame.to_string()) {
                        tracing::warn!(
                            "Failed to push '{}' to connection '{}': {}",
                            event_name,
                            target,
                            e
                        );
                        report.failed.push(target);
                    } else {
                        report.delivered.push(target);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast of '{}', skipping",
                        target,
                        event_name
                    );
                    report.failed.push(target);
                }
            }
        }
        report
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection_id) {
            sender
                .send(frame)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(connection_id.to_string()))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<DeliveryReport, MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;
        let report = Self::deliver(&clients, targets, &frame, event.name());
        tracing::debug!(
            "Broadcasted '{}' to {} connection(s)",
            event.name(),
            report.delivered_count()
        );
        Ok(report)
    }

    async fn broadcast_all(&self, event: &ServerEvent) -> Result<DeliveryReport, MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;
        let targets: Vec<ConnectionId> = clients.keys().copied().collect();
        let report = Self::deliver(&clients, targets, &frame, event.name());
        tracing::debug!(
            "Broadcasted '{}' to all {} connection(s)",
            event.name(),
            report.delivered_count()
        );
        Ok(report)
    }
}
