use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use super::types::{FlowState, Session, SessionField, StoredFile};
use super::SessionStore;
use crate::error::StorageError;

/// Transient in-process backend. DashMap gives per-key locking, so
/// distinct users never contend and same-user appends cannot be lost.
/// Expiry is lazy on `get` plus an explicit periodic sweep; the sweep
/// caller is responsible for clearing the ids this store reports.
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
    ttl_seconds: u64,
}

impl MemorySessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl_seconds,
        }
    }

    fn touch(session: &mut Session) {
        session.last_activity = Utc::now();
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Session, StorageError> {
        match self.sessions.get(user_id) {
            // Expired records read as absent; the sweep releases their
            // files.
            Some(entry) if entry.is_expired(Utc::now(), self.ttl_seconds) => {
                debug!(user_id, "session expired, reading as empty");
                Ok(Session::default())
            }
            Some(entry) => Ok(entry.clone()),
            None => Ok(Session::default()),
        }
    }

    async fn set_state(&self, user_id: &str, state: FlowState) -> Result<(), StorageError> {
        let mut entry = self.sessions.entry(user_id.to_string()).or_default();
        entry.state = state;
        Self::touch(&mut entry);
        Ok(())
    }

    async fn set_field(&self, user_id: &str, field: SessionField) -> Result<(), StorageError> {
        let mut entry = self.sessions.entry(user_id.to_string()).or_default();
        field.apply(&mut entry);
        Self::touch(&mut entry);
        Ok(())
    }

    async fn append_file(&self, user_id: &str, file: StoredFile) -> Result<(), StorageError> {
        let mut entry = self.sessions.entry(user_id.to_string()).or_default();
        entry.files.push(file);
        Self::touch(&mut entry);
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<Vec<StoredFile>, StorageError> {
        Ok(self
            .sessions
            .remove(user_id)
            .map(|(_, session)| session.files)
            .unwrap_or_default())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, StorageError> {
        Ok(self
            .sessions
            .iter()
            .filter(|entry| entry.is_expired(now, self.ttl_seconds))
            .map(|entry| entry.key().clone())
            .collect())
    }
}
