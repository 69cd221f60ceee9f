//! Watch command implementation

use std::sync::Arc;

use colored::Colorize;
use guard_core::daemon;

use super::runtime;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the daemon until Ctrl-C (or SIGTERM on unix).
pub fn run_watch(ctx: &Context) -> Result<()> {
    let runtime = runtime()?;
    runtime.block_on(async {
        let coordinator = Arc::new(ctx.coordinator()?);
        println!(
            "{} Guarding {}",
            "=>".blue().bold(),
            coordinator.conf_dir().display().to_string().cyan()
        );
        daemon::run(coordinator, ctx.settings.timings.debounce(), shutdown_signal()).await?;
        Ok::<_, CliError>(())
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
