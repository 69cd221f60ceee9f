//! Exclusive lock file shared between processes

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// A lock file that at most one holder, in any process, owns at a time.
#[derive(Debug, Clone)]
pub struct LockFile {
    path: PathBuf,
}

/// Ownership of a [`LockFile`]; released on drop.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the lock without waiting.
    ///
    /// Returns `Ok(None)` when another holder owns it. The parent
    /// directory is created if needed.
    pub fn try_acquire(&self) -> Result<Option<LockGuard>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Acquired lock");
                Ok(Some(LockGuard {
                    file,
                    path: self.path.clone(),
                }))
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
            Err(_) => Err(Error::LockFailed {
                path: self.path.clone(),
            }),
        }
    }
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), "Failed to release lock: {}", e);
        }
    }
}
