//! In-memory connection registry.
//!
//! Maps session ids to live recipients. A `BTreeMap` behind a tokio `RwLock`
//! keeps snapshots in id (= accept) order. The lock is only held while the
//! map itself is touched, never while a broadcast writes to sockets.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::domain::{Liveness, Recipient, RegistryError, SessionId};

/// Registry of connected participants, shared by every connection task.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    sessions: Arc<RwLock<BTreeMap<SessionId, Arc<dyn Recipient>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateId` if `id` is already present. The
    /// existing entry is left untouched.
    pub async fn insert(
        &self,
        id: SessionId,
        session: Arc<dyn Recipient>,
    ) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateId(id)),
            Entry::Vacant(entry) => {
                entry.insert(session);
                Ok(())
            }
        }
    }

    /// Remove a session, returning it if it was registered.
    ///
    /// Removing an absent id is a no-op.
    pub async fn remove(&self, id: SessionId) -> Option<Arc<dyn Recipient>> {
        self.sessions.write().await.remove(&id)
    }

    /// Point-in-time list of live sessions, ordered by id.
    pub async fn snapshot(&self) -> Vec<Arc<dyn Recipient>> {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|session| session.liveness() == Liveness::Alive)
            .cloned()
            .collect()
    }

    /// Remove and return every registered session.
    pub async fn drain(&self) -> Vec<Arc<dyn Recipient>> {
        let mut sessions = self.sessions.write().await;
        std::mem::take(&mut *sessions).into_values().collect()
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub async fn ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
