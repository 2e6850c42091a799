//! UseCase: ルーム参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomUseCase::join() / RoomUseCase::leave()
//!
//! ### なぜこのテストが必要か
//! - 参加した接続にだけ、そのルームの履歴が昇順で届くことを保証
//! - 別のルームに参加すると前のルームから外れることを確認
//! - 履歴取得に失敗した場合に参加前の状態へ戻ることを確認
//! - 参加中に発言されたメッセージが欠けず、重複せず、履歴の後に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルーム、履歴のあるルーム
//! - 異常系：Repository の障害
//! - エッジケース：全削除後の参加
//! - エッジケース：履歴の読み取り中に同じルームへ発言

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, HeldMessage, MessagePusher, MessageRepository, RoomName,
    ServerEvent, Visibility,
};

use super::{SharedMembership, error::JoinRoomError};

/// ルーム参加のユースケース
pub struct RoomUseCase {
    membership: SharedMembership,
    /// Repository（メッセージ永続化の抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomUseCase {
    pub fn new(
        membership: SharedMembership,
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            membership,
            message_repository,
            message_pusher,
        }
    }

    /// Bind the connection to `room` and send it the room's public history
    ///
    /// Joining replaces any previous room. If the history cannot be read the
    /// previous binding is restored.
    ///
    /// `chat-history` is the first room event the joiner receives. Messages
    /// published while the history is being read are held back and sent
    /// after it, unless the history already contains them.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ChatMessage>)` - 送信した履歴（タイムスタンプ昇順）
    /// * `Err(JoinRoomError::Persistence)` - 履歴の取得に失敗
    /// * `Err(JoinRoomError::DeliveryFailed)` - 履歴の送信に失敗
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        room: RoomName,
    ) -> Result<Vec<ChatMessage>, JoinRoomError> {
        // 1. バインドを更新し、ライブ配信を保留（ロックは Repository アクセス前に解放）
        let previous = {
            let mut membership = self.membership.lock().await;
            let previous = membership.join(connection_id, room.clone());
            membership.hold(connection_id);
            previous
        };

        // 2. 履歴を取得
        let history = match self
            .message_repository
            .history(&room, Visibility::Public)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                self.membership.lock().await.restore(connection_id, previous);
                tracing::error!(
                    "Failed to load history of room '{}' for connection '{}': {}",
                    room,
                    connection_id,
                    e
                );
                return Err(JoinRoomError::Persistence(e.to_string()));
            }
        };

        // 3. 参加した接続にだけ履歴を送信し、保留分を続けて送る
        //    （ロック中は新しいメッセージが割り込まない）
        {
            let mut membership = self.membership.lock().await;
            let held = not_in_history(&history, membership.release(&connection_id));
            self.message_pusher
                .push_to(&connection_id, &ServerEvent::ChatHistory(history.clone()))
                .await
                .map_err(|e| JoinRoomError::DeliveryFailed(e.to_string()))?;
            for HeldMessage { message, photo } in held {
                self.message_pusher
                    .push_to(
                        &connection_id,
                        &ServerEvent::ChatMessage {
                            sender: message.sender,
                            content: message.content,
                            photo,
                        },
                    )
                    .await
                    .map_err(|e| JoinRoomError::DeliveryFailed(e.to_string()))?;
            }
        }

        match previous {
            Some(previous) if previous != room => tracing::info!(
                "Connection '{}' moved from room '{}' to '{}'",
                connection_id,
                previous,
                room
            ),
            _ => tracing::info!("Connection '{}' joined room '{}'", connection_id, room),
        }
        Ok(history)
    }

    /// Drop the connection's room binding
    pub async fn leave(&self, connection_id: &ConnectionId) -> Option<RoomName> {
        self.membership.lock().await.leave(connection_id)
    }

    pub async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomName> {
        self.membership.lock().await.room_of(connection_id).cloned()
    }
}

/// Drop held messages the history already contains
fn not_in_history(history: &[ChatMessage], held: Vec<HeldMessage>) -> Vec<HeldMessage> {
    let Some(earliest) = held.iter().map(|h| h.message.timestamp).min() else {
        return held;
    };
    let mut seen: Vec<&ChatMessage> = history
        .iter()
        .filter(|message| message.timestamp >= earliest)
        .collect();
    held.into_iter()
        .filter(|h| match seen.iter().position(|message| **message == h.message) {
            Some(index) => {
                seen.swap_remove(index);
                false
            }
            None => true,
        })
        .collect()
}
