use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use super::types::{FlowState, Session, SessionField, StoredFile};
use super::SessionStore;
use crate::document::WatermarkPosition;
use crate::error::StorageError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sorted-set index of user ids by last activity. Redis expires the
/// session hash natively, but the file list must outlive it long
/// enough for the sweeper to release the files it names.
const ACTIVITY_INDEX: &str = "pdfbot:sessions:last_activity";

/// Durable backend. Scalar fields live in a per-user hash (independent
/// writes, last-write-wins), the file list in a per-user list (RPUSH is
/// atomic, so appends are never lost). The hash carries a native TTL;
/// the list gets twice the TTL so `sweep_expired` + `clear` can still
/// read the paths of an already-expired session.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub async fn connect(url: &str, ttl_seconds: u64) -> Result<Self, StorageError> {
        let client = Client::open(url)?;
        let mut conn = tokio::time::timeout(CONNECT_TIMEOUT, client.get_connection_manager())
            .await
            .map_err(|_| StorageError::ConnectTimeout)??;

        // Probe before committing to this backend.
        tokio::time::timeout(
            CONNECT_TIMEOUT,
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| StorageError::ConnectTimeout)??;

        Ok(Self { conn, ttl_seconds })
    }

    fn hash_key(user_id: &str) -> String {
        format!("pdfbot:session:{user_id}")
    }

    fn files_key(user_id: &str) -> String {
        format!("pdfbot:session:{user_id}:files")
    }

    /// Refresh TTLs and the activity index after any write.
    async fn touch(&self, user_id: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let now = Utc::now();
        redis::pipe()
            .hset(Self::hash_key(user_id), "last_activity", now.to_rfc3339())
            .ignore()
            .expire(Self::hash_key(user_id), self.ttl_seconds as i64)
            .ignore()
            .expire(Self::files_key(user_id), (self.ttl_seconds * 2) as i64)
            .ignore()
            .zadd(ACTIVITY_INDEX, user_id, now.timestamp())
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    fn decode_files(raw: Vec<String>) -> Result<Vec<StoredFile>, StorageError> {
        raw.iter()
            .map(|item| {
                serde_json::from_str(item).map_err(|e| StorageError::Decode(e.to_string()))
            })
            .collect()
    }

    fn decode_session(
        fields: HashMap<String, String>,
        files: Vec<StoredFile>,
    ) -> Session {
        let mut session = Session {
            files,
            ..Session::default()
        };

        // Scalar fields are decoded leniently: a single bad value is
        // logged and dropped, not allowed to brick the conversation.
        for (key, value) in fields {
            match key.as_str() {
                "state" => match FlowState::parse(&value) {
                    Some(state) => session.state = state,
                    None => warn!(value, "unknown flow state in session record"),
                },
                "new_name" => session.new_name = Some(value),
                "watermark_text" => session.watermark_text = Some(value),
                "watermark_position" => match WatermarkPosition::parse(&value) {
                    Some(position) => session.watermark_position = Some(position),
                    None => warn!(value, "unknown watermark position in session record"),
                },
                "watermark_opacity" => match value.parse() {
                    Ok(opacity) => session.watermark_opacity = Some(opacity),
                    Err(_) => warn!(value, "bad watermark opacity in session record"),
                },
                "last_activity" => match DateTime::parse_from_rfc3339(&value) {
                    Ok(ts) => session.last_activity = ts.with_timezone(&Utc),
                    Err(_) => warn!(value, "bad last_activity in session record"),
                },
                _ => {}
            }
        }
        session
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: &str) -> Result<Session, StorageError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(Self::hash_key(user_id)).await?;
        if fields.is_empty() {
            return Ok(Session::default());
        }
        let raw_files: Vec<String> = conn.lrange(Self::files_key(user_id), 0, -1).await?;
        Ok(Self::decode_session(fields, Self::decode_files(raw_files)?))
    }

    async fn set_state(&self, user_id: &str, state: FlowState) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(Self::hash_key(user_id), "state", state.as_str())
            .await?;
        self.touch(user_id).await
    }

    async fn set_field(&self, user_id: &str, field: SessionField) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(Self::hash_key(user_id), field.key(), field.value())
            .await?;
        self.touch(user_id).await
    }

    async fn append_file(&self, user_id: &str, file: StoredFile) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(&file).map_err(|e| StorageError::Decode(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(Self::files_key(user_id), encoded).await?;
        self.touch(user_id).await
    }

    async fn clear(&self, user_id: &str) -> Result<Vec<StoredFile>, StorageError> {
        let mut conn = self.conn.clone();
        let raw_files: Vec<String> = conn.lrange(Self::files_key(user_id), 0, -1).await?;
        redis::pipe()
            .del((Self::hash_key(user_id), Self::files_key(user_id)))
            .ignore()
            .zrem(ACTIVITY_INDEX, user_id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Self::decode_files(raw_files)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, StorageError> {
        let cutoff = now.timestamp() - self.ttl_seconds as i64;
        let mut conn = self.conn.clone();
        let expired: Vec<String> = conn
            .zrangebyscore(ACTIVITY_INDEX, "-inf", cutoff)
            .await?;
        Ok(expired)
    }
}
