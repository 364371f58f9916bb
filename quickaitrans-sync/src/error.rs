//! Error types for quickaitrans-sync.

use std::path::PathBuf;

use thiserror::Error;

use quickaitrans_core::TreeError;

use crate::config::ConfigError;

/// All errors that can abort a synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration file missing, unreadable, or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A translation file violates the allowed shape or is not valid
    /// JSON — includes the file path for context.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TreeError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
