//! Error types for guard-core

use std::path::PathBuf;

/// Result type for guard-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in guard-core operations
///
/// Only startup and configuration problems surface here. Failures inside
/// an enforcement cycle are recorded in its report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user's home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeDirUnresolved,

    /// The watched configuration directory does not exist
    #[error("Config directory not found: {path}")]
    ConfDirMissing { path: PathBuf },

    /// An explicitly requested settings file does not exist
    #[error("Settings file not found at {path}")]
    SettingsNotFound { path: PathBuf },

    /// The settings file is not valid TOML or has unknown fields
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// The filesystem watcher could not be created or attached
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from guard-fs
    #[error(transparent)]
    Fs(#[from] guard_fs::Error),

    /// Rule set error from guard-content
    #[error(transparent)]
    Content(#[from] guard_content::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure reported by the application-control interface
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    CommandFailed { command: String, status: String },
}
