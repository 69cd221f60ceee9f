//! Stop/start state machine

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use super::control::{AppControl, Termination};
use crate::error::ControlError;

/// Bounds for each wait in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval: Duration,
    pub exit_timeout: Duration,
    pub settle: Duration,
    pub start_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            exit_timeout: Duration::from_secs(60),
            settle: Duration::from_secs(1),
            start_timeout: Duration::from_secs(30),
        }
    }
}

/// Process patterns identifying the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppProfile {
    /// Pattern polled to decide whether the application is running.
    pub tracked_process: String,
    /// Patterns terminated on fallback and escalation.
    pub kill_patterns: Vec<String>,
}

/// How the stop request was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMethod {
    /// The application accepted a quit request.
    Graceful,
    /// The quit request failed; matching processes were sent SIGTERM.
    Forced,
}

/// How the wait for exit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The tracked process was observed gone.
    Confirmed { waited: Duration },
    /// The timeout expired; matching processes were killed and the cycle
    /// carried on without confirming the exit.
    Forced,
}

/// How the wait for start ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The tracked process was observed running.
    Confirmed { waited: Duration },
    /// Not observed before the timeout. Tolerated: the application may
    /// still come up later.
    TimedOut,
}

/// Drives the application through one stop/start cycle.
pub struct ProcessLifecycle {
    control: Arc<dyn AppControl>,
    profile: AppProfile,
    timings: Timings,
}

impl ProcessLifecycle {
    pub fn new(control: Arc<dyn AppControl>, profile: AppProfile, timings: Timings) -> Self {
        Self {
            control,
            profile,
            timings,
        }
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Ask the application to quit, terminating it if the request fails.
    pub async fn stop(&self) -> StopMethod {
        match self.control.request_quit().await {
            Ok(()) => {
                tracing::info!("Quit request accepted");
                StopMethod::Graceful
            }
            Err(e) => {
                tracing::warn!("Failed to quit gracefully: {} (terminating processes)", e);
                self.terminate_all(Termination::Term).await;
                StopMethod::Forced
            }
        }
    }

    /// Poll until the tracked process is gone, killing everything on timeout.
    pub async fn await_exit(&self) -> ExitOutcome {
        let tracked = &self.profile.tracked_process;
        tracing::info!(
            process = %tracked,
            timeout_secs = self.timings.exit_timeout.as_secs(),
            "Waiting for process to exit"
        );

        let started = Instant::now();
        let gone = self.poll_until(false);
        match tokio::time::timeout(self.timings.exit_timeout, gone).await {
            Ok(()) => {
                let waited = started.elapsed();
                tracing::info!(process = %tracked, ?waited, "Process exited");
                ExitOutcome::Confirmed { waited }
            }
            Err(_) => {
                tracing::warn!(process = %tracked, "Timed out waiting for exit, force killing");
                self.terminate_all(Termination::Kill).await;
                ExitOutcome::Forced
            }
        }
    }

    /// Short pause so the OS finishes tearing the process down.
    pub async fn settle(&self) {
        tokio::time::sleep(self.timings.settle).await;
    }

    /// Launch the application.
    pub async fn start(&self) -> Result<(), ControlError> {
        tracing::info!("Starting application");
        self.control.launch().await.inspect_err(|e| {
            tracing::error!("Failed to start application: {}", e);
        })
    }

    /// Poll until the tracked process appears. A timeout is logged only.
    pub async fn await_start(&self) -> StartOutcome {
        let tracked = &self.profile.tracked_process;
        let started = Instant::now();
        let running = self.poll_until(true);
        match tokio::time::timeout(self.timings.start_timeout, running).await {
            Ok(()) => {
                let waited = started.elapsed();
                tracing::info!(process = %tracked, ?waited, "Application started");
                StartOutcome::Confirmed { waited }
            }
            Err(_) => {
                tracing::warn!(
                    process = %tracked,
                    "Timed out waiting for start (it may be running but not detected)"
                );
                StartOutcome::TimedOut
            }
        }
    }

    /// Resolve once `is_running(tracked)` reports `target`.
    ///
    /// The first check happens one interval after the call. A failed
    /// presence query never counts as reaching `target`.
    async fn poll_until(&self, target: bool) {
        let period = self.timings.poll_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.control.is_running(&self.profile.tracked_process).await {
                Ok(running) if running == target => return,
                Ok(_) => {}
                Err(e) => tracing::warn!("Process presence check failed: {}", e),
            }
        }
    }

    async fn terminate_all(&self, mode: Termination) {
        for pattern in &self.profile.kill_patterns {
            if let Err(e) = self.control.terminate(pattern, mode).await {
                tracing::warn!(%pattern, %mode, "Terminate request failed: {}", e);
            }
        }
    }
}
