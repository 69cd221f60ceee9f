//! Settings resolution shared by every command

use std::path::PathBuf;
use std::sync::Arc;

use guard_core::config::{default_settings_path, resolve_conf_dir};
use guard_core::system::{OsaScriptNotifier, SystemAppControl};
use guard_core::{EnforcementCoordinator, Settings};

use crate::cli::Cli;
use crate::error::Result;

/// Loaded settings plus command-line overrides.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    /// Settings file actually read, if any.
    pub settings_path: Option<PathBuf>,
    conf_dir_override: Option<PathBuf>,
}

impl Context {
    /// Load settings named by `--config`, or the default file when present.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (settings, settings_path) = match &cli.config {
            Some(path) => (Settings::load(path)?, Some(path.clone())),
            None => match default_settings_path() {
                Some(path) if path.exists() => (Settings::load(&path)?, Some(path)),
                _ => (Settings::default(), None),
            },
        };

        if let Some(path) = &settings_path {
            tracing::debug!(path = %path.display(), "Loaded settings");
        }

        Ok(Self {
            settings,
            settings_path,
            conf_dir_override: cli.conf_dir.clone(),
        })
    }

    /// The guarded directory; it must exist.
    pub fn conf_dir(&self) -> Result<PathBuf> {
        Ok(resolve_conf_dir(
            self.conf_dir_override.as_deref(),
            self.settings.conf_dir.as_deref(),
        )?)
    }

    /// Coordinator wired to the real client and notification center.
    pub fn coordinator(&self) -> Result<EnforcementCoordinator> {
        let control = Arc::new(SystemAppControl::new(self.settings.app.name.clone()));
        let notifier = Arc::new(OsaScriptNotifier::new());
        Ok(EnforcementCoordinator::from_settings(
            &self.settings,
            self.conf_dir()?,
            control,
            Some(notifier),
        )?)
    }
}
