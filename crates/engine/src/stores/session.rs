//! Connected sessions keyed by character.

use std::sync::Arc;

use dashmap::DashMap;
use fieldhost_domain::CharacterId;

use crate::infrastructure::ports::{InventoryRepo, RepoError};
use crate::session::GameSession;

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<CharacterId, Arc<GameSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, returning any session it replaced.
    pub fn insert(&self, session: Arc<GameSession>) -> Option<Arc<GameSession>> {
        self.sessions.insert(session.character_id(), session)
    }

    pub fn get(&self, character_id: CharacterId) -> Option<Arc<GameSession>> {
        self.sessions
            .get(&character_id)
            .map(|entry| entry.value().clone())
    }

    pub fn remove(&self, character_id: CharacterId) -> Option<Arc<GameSession>> {
        self.sessions.remove(&character_id).map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Save every session. A failing session is logged and the rest still
    /// save; the first error is returned.
    pub async fn save_all(&self, repo: &dyn InventoryRepo) -> Result<(), RepoError> {
        let sessions: Vec<Arc<GameSession>> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut first_error = None;
        for session in sessions {
            if let Err(e) = session.save(repo).await {
                tracing::error!(
                    character_id = %session.character_id(),
                    error = %e,
                    "Failed to save session"
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
