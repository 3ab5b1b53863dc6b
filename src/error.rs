//! Error types for docsync.

use std::path::PathBuf;

use thiserror::Error;

/// docsync error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not a git repository: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Repository has no commits yet: {}", .0.display())]
    EmptyRepository(PathBuf),

    #[error("Invalid commit reference: {0}")]
    InvalidCommitReference(String),

    #[error("Failed to write report to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read checkpoint {}: {source}", path.display())]
    CheckpointRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse checkpoint {}: {source}", path.display())]
    CheckpointParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write checkpoint {}: {source}", path.display())]
    CheckpointWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkpoint is locked by another process: {}", .0.display())]
    CheckpointLocked(PathBuf),

    #[error(
        "Checkpoint {} changed during update (expected revision {expected}, found {found})",
        path.display()
    )]
    CheckpointConflict {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("Invalid config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a free-form message.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
