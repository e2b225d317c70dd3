use bytes::Bytes;

use crate::document::WatermarkPosition;
use crate::error::ValidationError;

/// Upload acceptance cap in bytes.
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// The only opacity values offered to users.
pub const OPACITY_CHOICES: [f32; 5] = [0.1, 0.3, 0.5, 0.7, 1.0];

/// Menu selections a user can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Merge,
    Rename,
    Watermark,
    Help,
    Cancel,
}

/// One inbound user interaction, already decoded by the transport.
#[derive(Debug, Clone)]
pub enum Event {
    Start,
    SelectAction(Action),
    UploadDocument {
        file_name: String,
        /// Size as declared by the transport, checked before the bytes
        /// are accepted.
        size_bytes: u64,
        data: Bytes,
    },
    TextInput(String),
    SelectPosition(WatermarkPosition),
    SelectOpacity(f32),
    /// "Done collecting, run the operation".
    Complete,
    Cancel,
}

/// Outbound effects for the transport to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Main action menu.
    Menu,
    Help,
    MergeIntro,
    RenameIntro,
    WatermarkIntro,
    /// Acknowledge one collected merge input.
    MergeFileAdded { count: usize },
    AskNewName,
    AskWatermarkText,
    AskWatermarkPosition,
    AskWatermarkOpacity,
    /// Input rejected; the session is unchanged.
    Invalid(ValidationError),
    /// A document arrived while no operation was selected.
    NoActiveOperation,
    /// The event makes no sense in the current state.
    RestartPrompt,
    /// A finished document ready to hand back to the user.
    Document {
        file_name: String,
        data: Bytes,
        caption: String,
    },
    Done,
    /// Processing failed; the session is unchanged so the user can
    /// retry or cancel.
    ProcessingFailed,
}
