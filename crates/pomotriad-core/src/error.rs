//! Error types for pomotriad-core.

use std::path::PathBuf;
use thiserror::Error;

/// Umbrella error type for the library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the persistent key-value store.
///
/// Callers on the timer path treat these as diagnostics, not failures: a
/// broken store degrades to defaults or an empty history, never a crash.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("query failed: {0}")]
    Query(String),

    #[error("corrupt value under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
