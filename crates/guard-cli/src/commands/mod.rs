//! Command implementations for guard-cli

pub mod backups;
pub mod check;
pub mod fix;
pub mod rules;
pub mod watch;

pub use backups::run_backups;
pub use check::run_check;
pub use fix::run_fix;
pub use rules::run_rules;
pub use watch::run_watch;

use crate::error::Result;

/// Multi-threaded runtime for commands that drive the client.
fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
