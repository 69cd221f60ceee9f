//! Well-known locations

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Location of the client's filter files relative to the home directory.
pub const APP_CONF_SUBPATH: &str =
    "Library/Application Support/SynologyDrive/SynologyDrive.app/Contents/Resources/conf";

/// Name of the settings directory under the platform config directory.
const SETTINGS_DIR: &str = "syno-guard";

/// Default watched directory for the current user.
pub fn default_conf_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(APP_CONF_SUBPATH))
        .ok_or(Error::HomeDirUnresolved)
}

/// Default settings file, `<config dir>/syno-guard/config.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join("config.toml"))
}

/// Pick the watched directory and verify it exists.
///
/// Precedence: `cli_override`, then `configured`, then the default.
pub fn resolve_conf_dir(cli_override: Option<&Path>, configured: Option<&Path>) -> Result<PathBuf> {
    let dir = match cli_override.or(configured) {
        Some(dir) => dir.to_path_buf(),
        None => default_conf_dir()?,
    };

    if !dir.is_dir() {
        return Err(Error::ConfDirMissing { path: dir });
    }

    tracing::debug!(conf_dir = %dir.display(), "Resolved config directory");
    Ok(dir)
}
