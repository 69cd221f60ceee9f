//! Settings file model

use std::path::{Path, PathBuf};
use std::time::Duration;

use guard_content::RuleSet;
use guard_fs::BackupStore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lifecycle::{AppProfile, Timings};

/// Filter files the client rewrites.
pub const DEFAULT_TARGET_FILES: &[&str] = &["blacklist.filter", "filter-v4150"];

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Watched directory; defaults to the client's directory under `$HOME`.
    pub conf_dir: Option<PathBuf>,
    /// Where backups go; defaults to the directory of the executable.
    pub backup_dir: Option<PathBuf>,
    /// Newest backups kept per file; `0` keeps all.
    pub backup_retention: usize,
    /// File names in `conf_dir` to watch and repair.
    pub target_files: Vec<String>,
    /// Tokens added to the built-in rule set.
    pub extra_tokens: Vec<String>,
    /// Use `extra_tokens` alone instead of extending the built-in set.
    pub replace_default_tokens: bool,
    /// Send a desktop notification after each repair.
    pub notifications: bool,
    pub timings: TimingSettings,
    pub app: AppSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conf_dir: None,
            backup_dir: None,
            backup_retention: guard_fs::backup::DEFAULT_RETENTION,
            target_files: DEFAULT_TARGET_FILES.iter().map(|s| s.to_string()).collect(),
            extra_tokens: Vec::new(),
            replace_default_tokens: false,
            notifications: true,
            timings: TimingSettings::default(),
            app: AppSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SettingsNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::parse(path, &std::fs::read_to_string(path)?)
    }

    /// Load settings from `path`, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse settings text; `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::SettingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The rule set after applying `extra_tokens`.
    pub fn rule_set(&self) -> Result<RuleSet> {
        if self.replace_default_tokens {
            return Ok(RuleSet::new(self.extra_tokens.iter().cloned())?);
        }
        let mut rules = RuleSet::defaults();
        rules.extend(self.extra_tokens.iter().cloned())?;
        Ok(rules)
    }

    /// Backup store for the configured (or default) location.
    pub fn backup_store(&self) -> Result<BackupStore> {
        let store = match &self.backup_dir {
            Some(dir) => BackupStore::new(dir),
            None => BackupStore::beside_executable()?,
        };
        Ok(store.with_retention(self.backup_retention))
    }
}

/// Durations in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSettings {
    /// Quiet period after the last change before checking.
    pub debounce: u64,
    /// Interval between process presence checks.
    pub poll_interval: u64,
    /// Wait for the client to exit before force-killing it.
    pub exit_timeout: u64,
    /// Pause between exit and writing.
    pub settle: u64,
    /// Wait for the client to reappear after launch.
    pub start_timeout: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            debounce: 5,
            poll_interval: 1,
            exit_timeout: 60,
            settle: 1,
            start_timeout: 30,
        }
    }
}

impl TimingSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce)
    }

    pub fn lifecycle(&self) -> Timings {
        Timings {
            // A zero interval would make tokio's interval panic.
            poll_interval: Duration::from_secs(self.poll_interval.max(1)),
            exit_timeout: Duration::from_secs(self.exit_timeout),
            settle: Duration::from_secs(self.settle),
            start_timeout: Duration::from_secs(self.start_timeout),
        }
    }
}

/// The monitored application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    /// Name used to quit and launch the application.
    pub name: String,
    /// Process pattern whose presence means "running".
    pub tracked_process: String,
    /// Process patterns terminated when a graceful quit fails or times out.
    pub kill_patterns: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "Synology Drive Client".to_string(),
            tracked_process: "cloud-drive-daemon".to_string(),
            kill_patterns: vec![
                "cloud-drive-daemon".to_string(),
                "cloud-drive-ui".to_string(),
            ],
        }
    }
}

impl AppSettings {
    pub fn profile(&self) -> AppProfile {
        AppProfile {
            tracked_process: self.tracked_process.clone(),
            kill_patterns: self.kill_patterns.clone(),
        }
    }
}
