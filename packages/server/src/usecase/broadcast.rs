//! Broadcast engine: room-scoped and global fan-out.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastEngine::publish() / publish_global() / relay_typing()
//!
//! ### なぜこのテストが必要か
//! - メッセージが保存されてから配信されることを保証
//! - ルーム外の接続に配信されないことを確認
//! - typing が送信者自身に戻らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームの全接続への配信
//! - 異常系：保存失敗時は配信しない
//! - エッジケース：プレゼンス未登録の送信者（photo は空）

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, DeliveryReport, MessageContent, MessagePushError, MessagePusher,
    MessageRepository, RoomName, ServerEvent, Username, Visibility,
};

use super::{SharedMembership, SharedPresence, error::PublishError};

/// Fan-out of events to connections
///
/// Target lists are snapshotted under the registry locks and the locks are
/// released before persistence or delivery.
pub struct BroadcastEngine {
    presence: SharedPresence,
    membership: SharedMembership,
    /// Repository（メッセージ永続化の抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEngine {
    pub fn new(
        presence: SharedPresence,
        membership: SharedMembership,
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence,
            membership,
            message_repository,
            message_pusher,
        }
    }

    /// Persist a public message, then deliver `chat-message` to the room
    ///
    /// The sender's photo is taken from presence; an unregistered sender gets
    /// an empty photo. Members still receiving their room history get the
    /// message after it.
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 保存されたメッセージ
    /// * `Err(PublishError::Persistence)` - 保存失敗（配信は行わない）
    pub async fn publish(
        &self,
        room: RoomName,
        sender: Username,
        content: MessageContent,
    ) -> Result<ChatMessage, PublishError> {
        // 1. 保存（失敗した場合は配信しない）
        let message = self
            .message_repository
            .append(room, sender, content, Visibility::Public)
            .await
            .map_err(|e| PublishError::Persistence(e.to_string()))?;

        // 2. 送信者の photo を解決
        let photo = {
            let presence = self.presence.lock().await;
            presence
                .photo_of(&message.sender)
                .cloned()
                .unwrap_or_default()
        };

        // 3. ルームの接続を取得して配信（履歴受信中の接続にはキューに積む）
        let targets = self.membership.lock().await.route(&message, &photo);
        let event = ServerEvent::ChatMessage {
            sender: message.sender.clone(),
            content: message.content.clone(),
            photo,
        };
        let report = self
            .message_pusher
            .broadcast(targets, &event)
            .await
            .map_err(|e| PublishError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Published message from '{}' to room '{}' ({} delivered, {} failed)",
            message.sender,
            message.room,
            report.delivered.len(),
            report.failed.len()
        );
        Ok(message)
    }

    /// Deliver an event to every connected connection, regardless of room
    pub async fn publish_global(
        &self,
        event: &ServerEvent,
    ) -> Result<DeliveryReport, MessagePushError> {
        self.message_pusher.broadcast_all(event).await
    }

    /// Relay a typing signal to the room, excluding the originator
    ///
    /// Best-effort: nothing is persisted and nothing is acknowledged.
    pub async fn relay_typing(
        &self,
        room: RoomName,
        name: Username,
        origin: &ConnectionId,
    ) -> Result<DeliveryReport, MessagePushError> {
        let targets: Vec<ConnectionId> = self
            .membership
            .lock()
            .await
            .members_of(&room)
            .into_iter()
            .filter(|id| id != origin)
            .collect();

        self.message_pusher
            .broadcast(targets, &ServerEvent::Typing { name, room })
            .await
    }
}
