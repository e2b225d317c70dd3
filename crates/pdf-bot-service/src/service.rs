//! Composition root: wires the session store, workspace and controller
//! together, and owns the background expiry sweeper.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::conversation::{ConversationController, Event, Reply};
use crate::document::DocumentProcessor;
use crate::error::StorageError;
use crate::session::{connect_store, SessionStore};
use crate::storage::Workspace;

pub struct PdfBotService {
    controller: Arc<ConversationController>,
    store: Arc<dyn SessionStore>,
    workspace: Arc<Workspace>,
    sweep_interval: Duration,
}

impl PdfBotService {
    /// Build from configuration: create the working directory and pick
    /// the session backend.
    pub async fn from_settings(settings: &Settings) -> std::io::Result<Self> {
        let workspace = Arc::new(Workspace::create(settings.storage.workdir.clone()).await?);
        let store = connect_store(&settings.session).await;
        Ok(Self::new(
            store,
            workspace,
            Duration::from_secs(settings.session.sweep_interval_seconds),
        ))
    }

    pub fn new(
        store: Arc<dyn SessionStore>,
        workspace: Arc<Workspace>,
        sweep_interval: Duration,
    ) -> Self {
        let controller = Arc::new(ConversationController::new(
            store.clone(),
            workspace.clone(),
            DocumentProcessor,
        ));
        Self {
            controller,
            store,
            workspace,
            sweep_interval,
        }
    }

    /// Handle one inbound event in the caller's task.
    pub async fn handle_event(
        &self,
        user_id: &str,
        event: Event,
    ) -> Result<Vec<Reply>, StorageError> {
        self.controller.handle(user_id, event).await
    }

    /// Handle one inbound event as its own unit of work, so a slow
    /// merge for one user never delays another user's events.
    pub fn dispatch(
        &self,
        user_id: String,
        event: Event,
    ) -> JoinHandle<Result<Vec<Reply>, StorageError>> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.handle(&user_id, event).await })
    }

    /// Periodic expiry sweep. The in-memory backend needs it for expiry
    /// itself; with redis it releases the files of sessions whose
    /// records have already expired natively.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let workspace = self.workspace.clone();
        let period = self.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = sweep_once(store.as_ref(), &workspace).await {
                    warn!("session sweep failed: {e}");
                }
            }
        })
    }
}

/// One expiry pass: clear every session past its TTL and release its
/// files. Returns how many sessions were cleared.
pub async fn sweep_once(
    store: &dyn SessionStore,
    workspace: &Workspace,
) -> Result<usize, StorageError> {
    sweep_once_at(store, workspace, Utc::now()).await
}

pub async fn sweep_once_at(
    store: &dyn SessionStore,
    workspace: &Workspace,
    now: DateTime<Utc>,
) -> Result<usize, StorageError> {
    let expired = store.sweep_expired(now).await?;
    let cleared = expired.len();
    for user_id in expired {
        let files = store.clear(&user_id).await?;
        workspace.remove_files(&files).await;
        debug!(user_id, "expired session cleared");
    }
    if cleared > 0 {
        info!(cleared, "expired sessions cleared");
    }
    Ok(cleared)
}
