use thiserror::Error;

/// User input rejected before any document work happens.
///
/// These never abort the conversation: the controller reports them and
/// leaves the session exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("only .pdf files are accepted")]
    NotPdf,

    #[error("file is too large, the limit is 20 MB")]
    FileTooLarge,

    #[error("at least 2 PDF files are needed to merge")]
    NotEnoughFiles,

    #[error("the new file name must not be empty")]
    EmptyName,

    #[error("opacity must be one of the offered values")]
    UnsupportedOpacity,
}

/// A source document failed to parse or an output failed to write.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to read PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Malformed(&'static str),

    #[error("processing task failed to run")]
    TaskFailed,
}

/// Session backend failures. Unreachable durable backends at startup are
/// recovered by falling back to the in-memory store, so these surface
/// only on individual operations after startup.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session backend error: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("session backend connect timed out")]
    ConnectTimeout,

    #[error("corrupt session record: {0}")]
    Decode(String),
}
