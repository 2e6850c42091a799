//! Room membership entity.
//!
//! Each connection is bound to at most one room. Joining another room
//! replaces the binding (implicit leave).
//!
//! A connection that is still receiving its room history can be put on
//! hold: chat messages routed to it meanwhile are queued instead of
//! delivered, and handed back by `release`.

use std::collections::HashMap;

use crate::domain::{
    entity::ChatMessage,
    value_object::{ConnectionId, Photo, RoomName},
};

/// Chat message queued for a connection on hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldMessage {
    pub message: ChatMessage,
    pub photo: Photo,
}

/// Connection → room bindings
#[derive(Debug, Clone, Default)]
pub struct RoomMembership {
    rooms: HashMap<ConnectionId, RoomName>,
    held: HashMap<ConnectionId, Vec<HeldMessage>>,
}

impl RoomMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `connection_id` to `room`
    ///
    /// Any hold from an earlier join is dropped.
    ///
    /// # Returns
    ///
    /// The room the connection was bound to before, if any.
    pub fn join(&mut self, connection_id: ConnectionId, room: RoomName) -> Option<RoomName> {
        self.held.remove(&connection_id);
        self.rooms.insert(connection_id, room)
    }

    /// Start queueing chat messages routed to `connection_id`
    pub fn hold(&mut self, connection_id: ConnectionId) {
        self.held.insert(connection_id, Vec::new());
    }

    /// Stop queueing and hand back what was queued, in routing order
    pub fn release(&mut self, connection_id: &ConnectionId) -> Vec<HeldMessage> {
        self.held.remove(connection_id).unwrap_or_default()
    }

    /// Put back a binding saved from an earlier `join` (or clear it)
    pub fn restore(&mut self, connection_id: ConnectionId, previous: Option<RoomName>) {
        self.held.remove(&connection_id);
        match previous {
            Some(room) => {
                self.rooms.insert(connection_id, room);
            }
            None => {
                self.rooms.remove(&connection_id);
            }
        }
    }

    /// Drop the connection's binding
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<RoomName> {
        self.held.remove(connection_id);
        self.rooms.remove(connection_id)
    }

    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomName> {
        self.rooms.get(connection_id)
    }

    /// Connections bound to `room` that are not on hold
    pub fn members_of(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms
            .iter()
            .filter(|(connection_id, bound)| {
                *bound == room && !self.held.contains_key(*connection_id)
            })
            .map(|(connection_id, _)| *connection_id)
            .collect()
    }

    /// Route a chat message to its room
    ///
    /// Members on hold get the message queued.
    ///
    /// # Returns
    ///
    /// The members to deliver to right away.
    pub fn route(&mut self, message: &ChatMessage, photo: &Photo) -> Vec<ConnectionId> {
        let mut live = Vec::new();
        for (connection_id, bound) in &self.rooms {
            if *bound != message.room {
                continue;
            }
            match self.held.get_mut(connection_id) {
                Some(queue) => queue.push(HeldMessage {
                    message: message.clone(),
                    photo: photo.clone(),
                }),
                None => live.push(*connection_id),
            }
        }
        live
    }
}
