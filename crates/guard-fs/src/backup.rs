//! Timestamped backups of filter files
//!
//! Each backup is a plain copy named `<file>.<YYYYmmdd_HHMMSS>.backup`.
//! Backups live outside the watched directory (by default next to the
//! running executable) so writing them never retriggers the watcher.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};

use crate::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_SUFFIX: &str = ".backup";

/// Number of backups kept per file unless configured otherwise.
pub const DEFAULT_RETENTION: usize = 20;

/// Directory of backup artifacts.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
    /// Newest backups kept per file; `0` keeps everything.
    retention: usize,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            retention: DEFAULT_RETENTION,
        }
    }

    /// Store backups in the directory containing the running executable.
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe().map_err(Error::ExecutableLocation)?;
        match exe.parent() {
            Some(dir) => Ok(Self::new(dir)),
            None => Err(Error::ExecutableLocation(std::io::Error::other(
                "executable has no parent directory",
            ))),
        }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the store, then prune old copies of the same file.
    ///
    /// Returns the path of the new backup.
    pub fn backup(&self, source: &Path) -> Result<PathBuf> {
        let file_name = file_name_of(source)?;
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let dest = self.dir.join(backup_name(&file_name, Local::now()));
        fs::copy(source, &dest).map_err(|e| Error::io(source, e))?;
        tracing::info!(
            source = %source.display(),
            backup = %dest.display(),
            "Backed up filter file"
        );

        if let Err(e) = self.prune(&file_name) {
            tracing::warn!(file = %file_name, "Failed to prune old backups: {}", e);
        }

        Ok(dest)
    }

    /// Backups of `file_name`, newest first.
    pub fn list(&self, file_name: &str) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut found: Vec<(NaiveDateTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| Error::io(&self.dir, e))? {
            let entry = entry.map_err(|e| Error::io(&self.dir, e))?;
            let name = entry.file_name();
            if let Some(stamp) = name.to_str().and_then(|n| parse_backup_name(n, file_name)) {
                found.push((stamp, entry.path()));
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// Delete backups of `file_name` beyond the retention limit.
    ///
    /// Returns how many were removed.
    pub fn prune(&self, file_name: &str) -> Result<usize> {
        if self.retention == 0 {
            return Ok(0);
        }

        let mut removed = 0;
        for stale in self.list(file_name)?.into_iter().skip(self.retention) {
            fs::remove_file(&stale).map_err(|e| Error::io(&stale, e))?;
            tracing::debug!(backup = %stale.display(), "Pruned backup");
            removed += 1;
        }
        Ok(removed)
    }
}

/// Backup file name for `file_name` taken at `at`.
pub fn backup_name(file_name: &str, at: DateTime<Local>) -> String {
    format!("{}.{}{}", file_name, at.format(TIMESTAMP_FORMAT), BACKUP_SUFFIX)
}

/// Timestamp of `name` if it is a backup of `file_name`.
fn parse_backup_name(name: &str, file_name: &str) -> Option<NaiveDateTime> {
    let stamp = name
        .strip_prefix(file_name)?
        .strip_prefix('.')?
        .strip_suffix(BACKUP_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_name_format() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            backup_name("blacklist.filter", at),
            "blacklist.filter.20260307_090501.backup"
        );
    }

    #[test]
    fn test_parse_backup_name_matches_only_own_file() {
        let name = "blacklist.filter.20260307_090501.backup";
        assert!(parse_backup_name(name, "blacklist.filter").is_some());
        assert!(parse_backup_name(name, "filter-v4150").is_none());
        assert!(parse_backup_name("blacklist.filter.junk.backup", "blacklist.filter").is_none());
    }
}
