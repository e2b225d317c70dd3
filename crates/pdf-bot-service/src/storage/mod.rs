//! Working-area file management for uploads and produced documents.

mod workspace;

pub use workspace::{sanitize_file_name, Workspace};
