//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! ルームごとの Vec をインメモリ DB として使用します。
//!
//! Timestamps come from the injected `Clock` and are clamped so they never go
//! below the previously assigned one, even if the wall clock steps back.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use engawa_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageContent, MessageRepository, RepositoryError, RoomName, Timestamp,
    Username, Visibility,
};

#[derive(Default)]
struct MessageLog {
    rooms: HashMap<RoomName, Vec<ChatMessage>>,
    last_timestamp: i64,
}

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    log: Mutex<MessageLog>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成（システム時計を使用）
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 時計を指定して作成
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            log: Mutex::new(MessageLog::default()),
            clock,
        }
    }

    /// 全ルームのメッセージ数
    pub async fn count(&self) -> usize {
        let log = self.log.lock().await;
        log.rooms.values().map(Vec::len).sum()
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        room: RoomName,
        sender: Username,
        content: MessageContent,
        visibility: Visibility,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut log = self.log.lock().await;

        let timestamp = self.clock.now_millis().max(log.last_timestamp);
        log.last_timestamp = timestamp;

        let message = ChatMessage::new(
            room.clone(),
            sender,
            content,
            Timestamp::new(timestamp),
            visibility,
        );
        log.rooms.entry(room).or_default().push(message.clone());

        Ok(message)
    }

    async fn history(
        &self,
        room: &RoomName,
        visibility: Visibility,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let log = self.log.lock().await;
        // Appends are in timestamp order already; the stable sort only guards
        // that invariant.
        let mut messages: Vec<ChatMessage> = log
            .rooms
            .get(room)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.visibility == visibility)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn clear_all(&self) -> Result<(), RepositoryError> {
        let mut log = self.log.lock().await;
        let removed: usize = log.rooms.values().map(Vec::len).sum();
        log.rooms.clear();
        tracing::info!("Cleared {} messages from all rooms", removed);
        Ok(())
    }
}
