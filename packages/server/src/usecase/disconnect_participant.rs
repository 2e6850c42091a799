//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断した接続がプレゼンス・ルーム・配信対象の全てから外れることを保証
//! - 残りの接続に users-update が届くことを確認
//! - 2 回目の切断処理が何もしないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みの接続の切断
//! - エッジケース：未登録の接続の切断（users-update は送らない）
//! - エッジケース：ユーザー名が別接続に引き継がれた後の古い接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

use super::{PresenceUseCase, RoomUseCase, error::RegisterUserError};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    presence: Arc<PresenceUseCase>,
    room: Arc<RoomUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        presence: Arc<PresenceUseCase>,
        room: Arc<RoomUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence,
            room,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// The connection is unregistered from delivery first so it never sees
    /// its own departure.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - プレゼンスから削除した（users-update を送信済み）
    /// * `Ok(false)` - 削除するプレゼンスがなかった
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<bool, RegisterUserError> {
        // 1. 配信対象から外す
        self.message_pusher.unregister_client(connection_id).await;

        // 2. ルームから外す
        if let Some(room) = self.room.leave(connection_id).await {
            tracing::debug!("Connection '{}' left room '{}'", connection_id, room);
        }

        // 3. プレゼンスから削除して残りの接続に通知
        let removed = self.presence.remove(connection_id).await?;

        tracing::info!("Connection '{}' closed", connection_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Photo,
        usecase::test_support::{Fixture, room, username},
    };

    fn create_usecase(fx: &Fixture) -> (DisconnectParticipantUseCase, Arc<PresenceUseCase>) {
        let presence = Arc::new(PresenceUseCase::new(
            fx.presence.clone(),
            fx.broadcast.clone(),
        ));
        let room = Arc::new(RoomUseCase::new(
            fx.membership.clone(),
            fx.messages.clone(),
            fx.pusher.clone(),
        ));
        (
            DisconnectParticipantUseCase::new(presence.clone(), room, fx.pusher.clone()),
            presence,
        )
    }

    #[tokio::test]
    async fn test_disconnect_removes_everywhere_and_notifies_others() {
        // テスト項目: 切断するとプレゼンス・ルーム・配信対象から外れ、残りの接続に users-update が届く
        // given (前提条件):
        let fx = Fixture::new();
        let (usecase, presence) = create_usecase(&fx);
        let mut alice = fx.connect().await;
        let mut bob = fx.connect().await;
        presence
            .register(alice.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        presence
            .register(bob.id, username("bob"), Photo::empty())
            .await
            .unwrap();
        fx.membership.lock().await.join(alice.id, room("lobby"));
        alice.drain();
        bob.drain();

        // when (操作):
        let removed = usecase.execute(&alice.id).await.unwrap();

        // then (期待する結果):
        assert!(removed);
        let updates = bob.drain_events("users-update");
        assert_eq!(updates.len(), 1);
        assert!(updates[0]["data"].get("alice").is_none());
        assert!(updates[0]["data"].get("bob").is_some());
        assert!(alice.drain().is_empty());
        assert!(fx.membership.lock().await.members_of(&room("lobby")).is_empty());
        assert_eq!(fx.pusher.count_clients().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 2 回目の切断処理は何もしない
        // given (前提条件):
        let fx = Fixture::new();
        let (usecase, presence) = create_usecase(&fx);
        let alice = fx.connect().await;
        let mut bob = fx.connect().await;
        presence
            .register(alice.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        usecase.execute(&alice.id).await.unwrap();
        bob.drain();

        // when (操作):
        let removed = usecase.execute(&alice.id).await.unwrap();

        // then (期待する結果):
        assert!(!removed);
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_unregistered_connection_sends_nothing() {
        // テスト項目: プレゼンス未登録の接続の切断では users-update を送らない
        let fx = Fixture::new();
        let (usecase, _presence) = create_usecase(&fx);
        let anonymous = fx.connect().await;
        let mut bob = fx.connect().await;

        let removed = usecase.execute(&anonymous.id).await.unwrap();

        assert!(!removed);
        assert!(bob.drain().is_empty());
    }

    #[tokio::test]
    async fn test_stale_disconnect_keeps_newer_presence() {
        // テスト項目: ユーザー名を別接続に引き継いだ後、古い接続の切断で新しい登録は消えない
        // given (前提条件):
        let fx = Fixture::new();
        let (usecase, presence) = create_usecase(&fx);
        let old = fx.connect().await;
        let new = fx.connect().await;
        presence
            .register(old.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        presence
            .register(new.id, username("alice"), Photo::empty())
            .await
            .unwrap();

        // when (操作):
        let removed = usecase.execute(&old.id).await.unwrap();

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(
            presence.snapshot().await[&username("alice")].connection_id,
            new.id
        );
    }
}
