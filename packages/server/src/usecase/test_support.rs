//! Test fixtures shared by the use case tests.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageContent, MessagePusher, Photo, RoomName, Username},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryMessageRepository,
    },
};

use super::{
    BroadcastEngine, SharedMembership, SharedPresence, new_shared_membership, new_shared_presence,
};

/// Wired-up collaborators backed by the real in-memory implementations
pub struct Fixture {
    pub presence: SharedPresence,
    pub membership: SharedMembership,
    pub messages: Arc<InMemoryMessageRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub broadcast: Arc<BroadcastEngine>,
}

impl Fixture {
    pub fn new() -> Self {
        let presence = new_shared_presence();
        let membership = new_shared_membership();
        let messages = Arc::new(InMemoryMessageRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcast = Arc::new(BroadcastEngine::new(
            presence.clone(),
            membership.clone(),
            messages.clone(),
            pusher.clone(),
        ));
        Self {
            presence,
            membership,
            messages,
            pusher,
            broadcast,
        }
    }

    /// Register a fresh connection with the pusher
    pub async fn connect(&self) -> TestConnection {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        self.pusher.register_client(id, tx).await;
        TestConnection { id, rx }
    }
}

/// A connection whose outbound frames can be inspected
pub struct TestConnection {
    pub id: ConnectionId,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestConnection {
    /// Drain every frame queued so far, parsed as JSON
    pub fn drain(&mut self) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    /// Drain and keep only frames with the given event name
    pub fn drain_events(&mut self, event: &str) -> Vec<serde_json::Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["event"] == event)
            .collect()
    }
}

pub fn username(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

pub fn room(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}

pub fn content(text: &str) -> MessageContent {
    MessageContent::new(text.to_string()).unwrap()
}

pub fn photo(value: &str) -> Photo {
    Photo::new(value.to_string())
}
