//! Daemon settings and path resolution
//!
//! Settings come from an optional TOML file. Every field has a default, so
//! an absent file at the default location simply yields the built-in
//! behaviour:
//!
//! ```toml
//! target_files = ["blacklist.filter", "filter-v4150"]
//! extra_tokens = ["coverage"]
//!
//! [timings]
//! debounce = 5
//! exit_timeout = 60
//!
//! [app]
//! name = "Synology Drive Client"
//! ```
//!
//! Command-line flags are applied on top by the caller.

mod paths;
mod settings;

pub use paths::{APP_CONF_SUBPATH, default_conf_dir, default_settings_path, resolve_conf_dir};
pub use settings::{AppSettings, Settings, TimingSettings};
