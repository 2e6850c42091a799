//! Presence registry entity.
//!
//! Live mapping of username to the connection that registered it, plus the
//! reverse binding from each connection to the username it registered.
//!
//! ## Invariants
//!
//! - At most one entry per username (last registration wins).
//! - An entry is only removed by the connection it currently points to, so a
//!   stale connection disconnecting never deletes a newer registration.

use std::collections::{BTreeMap, HashMap};

use crate::domain::value_object::{ConnectionId, Photo, Username};

/// Presence entry for one username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub connection_id: ConnectionId,
    pub photo: Photo,
}

/// Presence registry
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    entries: HashMap<Username, PresenceEntry>,
    bindings: HashMap<ConnectionId, Username>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `username` for `connection_id`, overwriting any prior entry
    ///
    /// If the connection had registered a different username before, that
    /// entry is dropped as long as it still points to this connection.
    ///
    /// # Returns
    ///
    /// The entry that was overwritten, if any.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        username: Username,
        photo: Photo,
    ) -> Option<PresenceEntry> {
        if let Some(previous) = self.bindings.insert(connection_id, username.clone())
            && previous != username
        {
            self.remove_entry_if_owned(&previous, &connection_id);
        }

        self.entries.insert(
            username,
            PresenceEntry {
                connection_id,
                photo,
            },
        )
    }

    /// Remove the entry registered by `connection_id`
    ///
    /// # Returns
    ///
    /// `true` if an entry was deleted. Calling this again for the same
    /// connection, or for a connection whose username has since been taken
    /// over by another connection, returns `false`.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> bool {
        match self.bindings.remove(connection_id) {
            Some(username) => self.remove_entry_if_owned(&username, connection_id),
            None => false,
        }
    }

    fn remove_entry_if_owned(&mut self, username: &Username, connection_id: &ConnectionId) -> bool {
        let owned = self
            .entries
            .get(username)
            .is_some_and(|entry| &entry.connection_id == connection_id);
        if owned {
            self.entries.remove(username);
        }
        owned
    }

    /// Ordered copy of the current mapping
    pub fn snapshot(&self) -> BTreeMap<Username, PresenceEntry> {
        self.entries
            .iter()
            .map(|(username, entry)| (username.clone(), entry.clone()))
            .collect()
    }

    pub fn photo_of(&self, username: &Username) -> Option<&Photo> {
        self.entries.get(username).map(|entry| &entry.photo)
    }

    pub fn get(&self, username: &Username) -> Option<&PresenceEntry> {
        self.entries.get(username)
    }

    /// Username bound to a connection, even if its entry was taken over since
    pub fn bound_username(&self, connection_id: &ConnectionId) -> Option<&Username> {
        self.bindings.get(connection_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
