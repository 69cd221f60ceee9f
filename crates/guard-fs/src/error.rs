//! Error types for guard-fs

use std::path::PathBuf;

/// Result type for guard-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in guard-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Elevated write to {path} failed: {message}")]
    Elevated { path: PathBuf, message: String },

    #[error("Could not locate the running executable: {0}")]
    ExecutableLocation(#[source] std::io::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this failure should be retried with elevated rights.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}
