//! Per-user session persistence.
//!
//! One trait, two interchangeable backends: redis with native key
//! expiry, and an in-process DashMap store that needs periodic
//! sweeping. The controller is written against the trait only; the
//! backend is picked once at startup.

mod memory;
mod redis_store;
mod types;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::StorageError;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use types::{FlowState, Session, SessionField, StoredFile};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the session for a user, or a default idle session if none
    /// exists. Never fails on a missing key.
    async fn get(&self, user_id: &str) -> Result<Session, StorageError>;

    /// Upsert the flow state and refresh `last_activity`.
    async fn set_state(&self, user_id: &str, state: FlowState) -> Result<(), StorageError>;

    /// Upsert a single optional field and refresh `last_activity`.
    /// Field writes are independent and last-write-wins.
    async fn set_field(&self, user_id: &str, field: SessionField) -> Result<(), StorageError>;

    /// Append to the file list, preserving insertion order. Appends are
    /// atomic with respect to each other.
    async fn append_file(&self, user_id: &str, file: StoredFile) -> Result<(), StorageError>;

    /// Delete the session record and return the file references it
    /// held. The store does not touch the filesystem; the caller
    /// releases the files.
    async fn clear(&self, user_id: &str) -> Result<Vec<StoredFile>, StorageError>;

    /// User ids whose last activity is older than the TTL, for the
    /// caller to `clear`.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, StorageError>;
}

/// Pick the session backend once at startup. A configured but
/// unreachable redis falls back silently to the in-memory store; the
/// failure is logged, never surfaced to users.
pub async fn connect_store(config: &SessionConfig) -> Arc<dyn SessionStore> {
    if let Some(url) = &config.redis_url {
        match RedisSessionStore::connect(url, config.ttl_seconds).await {
            Ok(store) => {
                info!("connected to redis session backend");
                return Arc::new(store);
            }
            Err(e) => warn!("redis unavailable, using in-memory sessions: {e}"),
        }
    } else {
        info!("no redis url configured, using in-memory sessions");
    }
    Arc::new(MemorySessionStore::new(config.ttl_seconds))
}
