//! Active-session registry
//!
//! Concurrent map from session id to the live session. Sessions insert
//! themselves when created and remove themselves on teardown; removal is
//! idempotent.

use std::sync::Arc;

use dashmap::DashMap;

use crate::session::{GameSession, SessionId};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<GameSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, session: Arc<GameSession>) {
        self.sessions.insert(session.id(), session);
    }

    /// Remove a session. Returns `false` if it was already gone.
    pub(crate) fn remove(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<GameSession>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
