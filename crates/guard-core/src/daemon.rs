//! Long-running watch loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::enforce::{EnforcementCoordinator, TriggerOutcome};
use crate::error::Result;
use crate::watch::{ChangeWatcher, Debouncer};

/// How often shutdown checks whether a cycle is still running.
const DRAIN_POLL: Duration = Duration::from_millis(100);

/// Enforce once, then keep the filter files compliant until `shutdown`
/// resolves.
///
/// Each qualifying change re-arms a debounce timer of `debounce`; when it
/// elapses a check runs on its own task, so later changes cannot cancel a
/// cycle in progress. On shutdown the watcher is dropped first, any
/// pending timer is cancelled, and a running cycle is allowed to finish.
pub async fn run<F>(
    coordinator: Arc<EnforcementCoordinator>,
    debounce: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let dir = coordinator.conf_dir().to_path_buf();
    tracing::info!(conf_dir = %dir.display(), "Starting filter guard");

    log_outcome(&coordinator.check_and_enforce().await);

    let trigger = Arc::clone(&coordinator);
    let debouncer = Arc::new(Debouncer::new(debounce, move || {
        let coordinator = Arc::clone(&trigger);
        tokio::spawn(async move {
            log_outcome(&coordinator.check_and_enforce().await);
        });
    }));

    let watcher = ChangeWatcher::start(
        &dir,
        coordinator.target_files().to_vec(),
        Arc::clone(&debouncer),
    )?;

    shutdown.await;
    tracing::info!("Shutting down");

    drop(watcher);
    if debouncer.cancel() {
        tracing::debug!("Dropped pending check");
    }
    while coordinator.is_busy() {
        tracing::debug!(phase = %coordinator.phase(), "Waiting for active cycle");
        tokio::time::sleep(DRAIN_POLL).await;
    }

    tracing::info!("Stopped");
    Ok(())
}

fn log_outcome(outcome: &TriggerOutcome) {
    match outcome {
        TriggerOutcome::Compliant => tracing::debug!("Filter files compliant"),
        TriggerOutcome::Queued => {}
        TriggerOutcome::Enforced(report) => {
            if report.is_clean() {
                tracing::info!(updated = report.updated_any(), "Enforcement cycle complete");
            } else {
                tracing::warn!(
                    updated = report.updated_any(),
                    exit = ?report.exit,
                    start = ?report.start,
                    "Enforcement cycle completed with problems"
                );
            }
        }
    }
}
