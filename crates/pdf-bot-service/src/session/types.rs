use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::document::WatermarkPosition;

/// Where a user is inside a multi-step operation. Exactly one operation
/// can be in flight per user; `Idle` means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    MergeCollecting,
    RenameAwaitFile,
    RenameAwaitName,
    WatermarkAwaitFile,
    WatermarkAwaitText,
    WatermarkAwaitPosition,
    WatermarkAwaitOpacity,
}

impl FlowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::MergeCollecting => "merge_collecting",
            FlowState::RenameAwaitFile => "rename_await_file",
            FlowState::RenameAwaitName => "rename_await_name",
            FlowState::WatermarkAwaitFile => "watermark_await_file",
            FlowState::WatermarkAwaitText => "watermark_await_text",
            FlowState::WatermarkAwaitPosition => "watermark_await_position",
            FlowState::WatermarkAwaitOpacity => "watermark_await_opacity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "idle" => FlowState::Idle,
            "merge_collecting" => FlowState::MergeCollecting,
            "rename_await_file" => FlowState::RenameAwaitFile,
            "rename_await_name" => FlowState::RenameAwaitName,
            "watermark_await_file" => FlowState::WatermarkAwaitFile,
            "watermark_await_text" => FlowState::WatermarkAwaitText,
            "watermark_await_position" => FlowState::WatermarkAwaitPosition,
            "watermark_await_opacity" => FlowState::WatermarkAwaitOpacity,
            _ => return None,
        })
    }
}

/// A source document admitted into the working area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Original name as uploaded, kept for replies and logging.
    pub file_name: String,
}

/// Per-user conversation record. `files` keeps insertion order: it is
/// the merge order, and the single document for rename/watermark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: FlowState,
    pub files: Vec<StoredFile>,
    pub new_name: Option<String>,
    pub watermark_text: Option<String>,
    pub watermark_position: Option<WatermarkPosition>,
    pub watermark_opacity: Option<f32>,
    pub last_activity: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: FlowState::Idle,
            files: Vec::new(),
            new_name: None,
            watermark_text: None,
            watermark_position: None,
            watermark_opacity: None,
            last_activity: Utc::now(),
        }
    }
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        now.signed_duration_since(self.last_activity)
            > chrono::Duration::seconds(ttl_seconds as i64)
    }
}

/// One optional session field. A closed enum instead of stringly-typed
/// keys, so a store cannot be asked to write a field that does not
/// exist.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionField {
    NewName(String),
    WatermarkText(String),
    WatermarkPosition(WatermarkPosition),
    WatermarkOpacity(f32),
}

impl SessionField {
    pub fn key(&self) -> &'static str {
        match self {
            SessionField::NewName(_) => "new_name",
            SessionField::WatermarkText(_) => "watermark_text",
            SessionField::WatermarkPosition(_) => "watermark_position",
            SessionField::WatermarkOpacity(_) => "watermark_opacity",
        }
    }

    pub fn value(&self) -> String {
        match self {
            SessionField::NewName(v) | SessionField::WatermarkText(v) => v.clone(),
            SessionField::WatermarkPosition(p) => p.as_str().to_string(),
            SessionField::WatermarkOpacity(v) => v.to_string(),
        }
    }

    /// Apply this field to an in-memory session record.
    pub fn apply(&self, session: &mut Session) {
        match self {
            SessionField::NewName(v) => session.new_name = Some(v.clone()),
            SessionField::WatermarkText(v) => session.watermark_text = Some(v.clone()),
            SessionField::WatermarkPosition(p) => session.watermark_position = Some(*p),
            SessionField::WatermarkOpacity(v) => session.watermark_opacity = Some(*v),
        }
    }
}
