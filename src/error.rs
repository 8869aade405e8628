//! Error types for canopy

use thiserror::Error;

/// Result type alias for canopy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in canopy operations
///
/// Absent keys are never errors: lookups return `None` and structural
/// operations on a missing path return the structure unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Parse error at token {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid snapshot file: {0}")]
    InvalidFile(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Snapshot kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },
}

impl Error {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
