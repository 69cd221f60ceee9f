//! Error types for guard-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from guard-core
    #[error(transparent)]
    Core(#[from] guard_core::Error),

    /// Error from guard-fs
    #[error(transparent)]
    Fs(#[from] guard_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `check` found files that need repair
    #[error("{count} filter file(s) missing ignore rules")]
    NonCompliant { count: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
