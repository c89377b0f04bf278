//! Error types for the upload sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for upload sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the upload sorter
///
/// Every variant except [`Error::DateDetection`] aborts a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to list directory {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to detect file time for {path}: {source}")]
    DateDetection {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File hash computation failed for {path}: {source}")]
    HashComputation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove duplicate {path}: {source}")]
    RemoveDuplicate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} -> {to}: {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find a free file name for {path}")]
    NameConflict { path: PathBuf },

    #[error("Dropbox lookup failed: {0}")]
    Dropbox(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the run can continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DateDetection { .. })
    }
}
