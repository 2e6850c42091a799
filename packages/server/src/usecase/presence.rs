//! UseCase: プレゼンス登録・削除
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PresenceUseCase::register() / PresenceUseCase::remove()
//!
//! ### なぜこのテストが必要か
//! - 登録ごとに users-update がちょうど 1 回全接続に届くことを保証
//! - 同じユーザー名の再登録が上書きになることを確認
//! - 削除が冪等であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規登録、削除
//! - エッジケース：同じユーザー名を別接続から登録（後勝ち）
//! - エッジケース：古い接続の切断が新しい登録を消さない

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{ConnectionId, PresenceEntry, Photo, ServerEvent, Username};

use super::{BroadcastEngine, SharedPresence, error::RegisterUserError};

/// プレゼンス管理のユースケース
///
/// `users-update` is published while the presence lock is held, so every
/// connection observes snapshots in registry order.
pub struct PresenceUseCase {
    presence: SharedPresence,
    broadcast: Arc<BroadcastEngine>,
}

impl PresenceUseCase {
    pub fn new(presence: SharedPresence, broadcast: Arc<BroadcastEngine>) -> Self {
        Self {
            presence,
            broadcast,
        }
    }

    /// Register a username for a connection and announce it to everyone
    ///
    /// Publishes `users-update` with the full snapshot, then `user-joined`.
    /// If either cannot be published the registry is rolled back.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        username: Username,
        photo: Photo,
    ) -> Result<(), RegisterUserError> {
        let mut presence = self.presence.lock().await;
        let before = presence.clone();
        if let Some(previous) = presence.register(connection_id, username.clone(), photo)
            && previous.connection_id != connection_id
        {
            tracing::info!(
                "Presence for '{}' moved from connection '{}' to '{}'",
                username,
                previous.connection_id,
                connection_id
            );
        }

        let announced = async {
            self.broadcast
                .publish_global(&ServerEvent::UsersUpdate(presence.snapshot()))
                .await?;
            self.broadcast
                .publish_global(&ServerEvent::UserJoined {
                    username: username.clone(),
                })
                .await
        }
        .await;
        if let Err(e) = announced {
            *presence = before;
            return Err(e.into());
        }

        tracing::info!(
            "User '{}' registered on connection '{}' ({} online)",
            username,
            connection_id,
            presence.len()
        );
        Ok(())
    }

    /// Remove the presence entry owned by a connection
    ///
    /// `users-update` is published only when an entry was actually removed.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed.
    pub async fn remove(&self, connection_id: &ConnectionId) -> Result<bool, RegisterUserError> {
        let mut presence = self.presence.lock().await;
        if !presence.remove(connection_id) {
            return Ok(false);
        }

        self.broadcast
            .publish_global(&ServerEvent::UsersUpdate(presence.snapshot()))
            .await?;
        tracing::info!(
            "Presence for connection '{}' removed ({} online)",
            connection_id,
            presence.len()
        );
        Ok(true)
    }

    pub async fn snapshot(&self) -> BTreeMap<Username, PresenceEntry> {
        self.presence.lock().await.snapshot()
    }

    /// Username a connection registered, if any
    pub async fn username_of(&self, connection_id: &ConnectionId) -> Option<Username> {
        self.presence
            .lock()
            .await
            .bound_username(connection_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePushError, message_pusher::MockMessagePusher},
        infrastructure::repository::InMemoryMessageRepository,
        usecase::{
            new_shared_membership, new_shared_presence,
            test_support::{Fixture, photo, username},
        },
    };

    fn create_usecase(fx: &Fixture) -> PresenceUseCase {
        PresenceUseCase::new(fx.presence.clone(), fx.broadcast.clone())
    }

    #[tokio::test]
    async fn test_register_broadcasts_users_update_once() {
        // テスト項目: 登録すると全接続に users-update と user-joined が 1 回ずつ届く
        // given (前提条件):
        let fx = Fixture::new();
        let usecase = create_usecase(&fx);
        let mut alice = fx.connect().await;
        let mut bob = fx.connect().await;

        // when (操作):
        usecase
            .register(alice.id, username("alice"), photo("a.png"))
            .await
            .unwrap();

        // then (期待する結果):
        for conn in [&mut alice, &mut bob] {
            let frames = conn.drain();
            assert_eq!(frames.len(), 2);
            assert_eq!(frames[0]["event"], "users-update");
            assert_eq!(frames[0]["data"]["alice"]["photo"], "a.png");
            assert_eq!(frames[1]["event"], "user-joined");
            assert_eq!(frames[1]["data"]["username"], "alice");
        }
        assert_eq!(
            usecase.snapshot().await[&username("alice")].connection_id,
            alice.id
        );
    }

    #[tokio::test]
    async fn test_register_same_username_last_write_wins() {
        // テスト項目: 同じユーザー名を別接続から登録すると後の登録で上書きされる
        // given (前提条件):
        let fx = Fixture::new();
        let usecase = create_usecase(&fx);
        let first = fx.connect().await;
        let second = fx.connect().await;

        // when (操作):
        usecase
            .register(first.id, username("alice"), photo("old.png"))
            .await
            .unwrap();
        usecase
            .register(second.id, username("alice"), photo("new.png"))
            .await
            .unwrap();

        // then (期待する結果):
        let snapshot = usecase.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&username("alice")].connection_id, second.id);
        assert_eq!(snapshot[&username("alice")].photo, photo("new.png"));
    }

    #[tokio::test]
    async fn test_stale_connection_remove_keeps_newer_registration() {
        // テスト項目: 上書きされた古い接続を削除しても新しい登録は残る
        // given (前提条件):
        let fx = Fixture::new();
        let usecase = create_usecase(&fx);
        let first = fx.connect().await;
        let mut second = fx.connect().await;
        usecase
            .register(first.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        usecase
            .register(second.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        second.drain();

        // when (操作):
        let removed = usecase.remove(&first.id).await.unwrap();

        // then (期待する結果):
        assert!(!removed);
        assert!(second.drain().is_empty());
        assert!(usecase.snapshot().await.contains_key(&username("alice")));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: 2 回目の削除は何もしない（users-update も送らない）
        // given (前提条件):
        let fx = Fixture::new();
        let usecase = create_usecase(&fx);
        let alice = fx.connect().await;
        let mut bob = fx.connect().await;
        usecase
            .register(alice.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        bob.drain();

        // when (操作):
        let first = usecase.remove(&alice.id).await.unwrap();
        let second = usecase.remove(&alice.id).await.unwrap();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        let updates = bob.drain_events("users-update");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0]["data"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_reregister_under_new_name_drops_old_entry() {
        // テスト項目: 同じ接続が別名で登録し直すと旧エントリは消える
        let fx = Fixture::new();
        let usecase = create_usecase(&fx);
        let conn = fx.connect().await;

        usecase
            .register(conn.id, username("alice"), Photo::empty())
            .await
            .unwrap();
        usecase
            .register(conn.id, username("alicia"), Photo::empty())
            .await
            .unwrap();

        let snapshot = usecase.snapshot().await;
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec![&username("alicia")]);
        assert_eq!(usecase.username_of(&conn.id).await, Some(username("alicia")));
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_announcement_fails() {
        // テスト項目: users-update を配信できない場合は登録前の状態に戻る
        // given (前提条件):
        let presence = new_shared_presence();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast_all()
            .returning(|_| Err(MessagePushError::Encode("broken".to_string())));
        let broadcast = Arc::new(BroadcastEngine::new(
            presence.clone(),
            new_shared_membership(),
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(pusher),
        ));
        let usecase = PresenceUseCase::new(presence.clone(), broadcast);
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        presence
            .lock()
            .await
            .register(first, username("alice"), photo("old.png"));

        // when (操作):
        let result = usecase
            .register(second, username("alice"), photo("new.png"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RegisterUserError::BroadcastFailed(_))));
        let snapshot = usecase.snapshot().await;
        assert_eq!(snapshot[&username("alice")].connection_id, first);
        assert_eq!(snapshot[&username("alice")].photo, photo("old.png"));
        assert_eq!(usecase.username_of(&second).await, None);
    }
}
