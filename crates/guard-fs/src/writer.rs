//! Backup-then-write persistence with privilege fallback

use std::fmt;
use std::path::Path;

use crate::backup::BackupStore;
use crate::elevated::{PrivilegedWrite, SudoTee};
use crate::{Result, io};

/// How a write reached the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    /// Unprivileged atomic write.
    Direct,
    /// Retried through the elevated helper after permission was denied.
    Elevated,
}

impl fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Elevated => write!(f, "elevated"),
        }
    }
}

/// Persists filter-file content.
pub struct PersistenceWriter {
    backups: BackupStore,
    elevated: Box<dyn PrivilegedWrite>,
}

impl PersistenceWriter {
    /// Writer that escalates through `sudo`.
    pub fn new(backups: BackupStore) -> Self {
        Self::with_elevated(backups, SudoTee::new())
    }

    pub fn with_elevated(backups: BackupStore, elevated: impl PrivilegedWrite + 'static) -> Self {
        Self {
            backups,
            elevated: Box::new(elevated),
        }
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Back up `path`, then replace its content.
    ///
    /// A failed backup is logged and does not stop the write. Permission
    /// errors from the direct write are retried once through the elevated
    /// helper; any other failure is returned with the file untouched.
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteMethod> {
        if let Err(e) = self.backups.backup(path) {
            tracing::warn!(path = %path.display(), "Backup failed, writing anyway: {}", e);
        }

        match io::write_text(path, content) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Wrote filter file");
                Ok(WriteMethod::Direct)
            }
            Err(e) if e.is_permission_denied() => {
                tracing::warn!(
                    path = %path.display(),
                    "Permission denied, retrying with elevated helper"
                );
                self.elevated.write(path, content.as_bytes())?;
                tracing::info!(path = %path.display(), "Wrote filter file with elevated helper");
                Ok(WriteMethod::Elevated)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "Failed to write filter file: {}", e);
                Err(e)
            }
        }
    }
}
