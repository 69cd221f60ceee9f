//! End-to-end enforcement cycle with single-flight guarding

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use guard_content::{ConfigMerger, missing_tokens};
use guard_fs::{LockFile, LockGuard, PersistenceWriter, io};

use super::report::{
    ComplianceStatus, CyclePhase, CycleReport, FileCompliance, FileOutcome, FilePreview,
    FileReport, TriggerOutcome,
};
use crate::config::Settings;
use crate::error::Result;
use crate::lifecycle::{AppControl, ProcessLifecycle};
use crate::notifier::{Notifier, REPAIR_MESSAGE, REPAIR_TITLE};

/// Lock file, in the backup directory, held while a process runs cycles.
pub const CYCLE_LOCK_FILE: &str = ".syno-guard.lock";

/// Checks the target files and, when needed, repairs them around an
/// application restart.
///
/// Filter files are re-read from disk on every check and every write; no
/// parsed state survives between calls. At most one cycle runs at a time:
/// a trigger that arrives while one is active is folded into a single
/// follow-up check once it finishes. With a cycle lock configured, the same
/// holds across processes sharing the lock file.
pub struct EnforcementCoordinator {
    conf_dir: PathBuf,
    target_files: Vec<String>,
    merger: ConfigMerger,
    writer: PersistenceWriter,
    lifecycle: ProcessLifecycle,
    notifier: Option<Arc<dyn Notifier>>,
    cycle_lock: Option<LockFile>,
    phase: Mutex<CyclePhase>,
    in_flight: AtomicBool,
    recheck: AtomicBool,
}

impl EnforcementCoordinator {
    pub fn new(
        conf_dir: impl Into<PathBuf>,
        target_files: Vec<String>,
        merger: ConfigMerger,
        writer: PersistenceWriter,
        lifecycle: ProcessLifecycle,
    ) -> Self {
        Self {
            conf_dir: conf_dir.into(),
            target_files,
            merger,
            writer,
            lifecycle,
            notifier: None,
            cycle_lock: None,
            phase: Mutex::new(CyclePhase::Idle),
            in_flight: AtomicBool::new(false),
            recheck: AtomicBool::new(false),
        }
    }

    /// Assemble a coordinator from loaded settings.
    ///
    /// `notifier` is ignored when notifications are switched off.
    pub fn from_settings(
        settings: &Settings,
        conf_dir: impl Into<PathBuf>,
        control: Arc<dyn AppControl>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self> {
        let merger = ConfigMerger::new(settings.rule_set()?);
        let backups = settings.backup_store()?;
        let cycle_lock = LockFile::new(backups.dir().join(CYCLE_LOCK_FILE));
        let writer = PersistenceWriter::new(backups);
        let lifecycle = ProcessLifecycle::new(
            control,
            settings.app.profile(),
            settings.timings.lifecycle(),
        );

        let coordinator = Self::new(
            conf_dir,
            settings.target_files.clone(),
            merger,
            writer,
            lifecycle,
        )
        .with_cycle_lock(cycle_lock);
        Ok(match notifier {
            Some(notifier) if settings.notifications => coordinator.with_notifier(notifier),
            _ => coordinator,
        })
    }

    /// Send a notification at the end of every cycle.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Share the single-cycle guarantee with other processes using `lock`.
    pub fn with_cycle_lock(mut self, lock: LockFile) -> Self {
        self.cycle_lock = Some(lock);
        self
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    pub fn target_files(&self) -> &[String] {
        &self.target_files
    }

    pub fn merger(&self) -> &ConfigMerger {
        &self.merger
    }

    pub fn writer(&self) -> &PersistenceWriter {
        &self.writer
    }

    /// Current cycle phase.
    pub fn phase(&self) -> CyclePhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a trigger is being handled right now.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Compliance of every target file, read fresh from disk.
    pub fn compliance(&self) -> Vec<FileCompliance> {
        self.target_files
            .iter()
            .map(|file| {
                let path = self.conf_dir.join(file);
                let status = match self.read_target(&path) {
                    Ok(Some(text)) => {
                        let missing: Vec<String> = missing_tokens(&text, self.merger.rules())
                            .into_iter()
                            .map(|t| t.to_string())
                            .collect();
                        if missing.is_empty() {
                            ComplianceStatus::Compliant
                        } else {
                            ComplianceStatus::NonCompliant { missing }
                        }
                    }
                    Ok(None) => ComplianceStatus::Missing,
                    Err(reason) => ComplianceStatus::Unreadable { reason },
                };
                FileCompliance {
                    file: file.clone(),
                    path,
                    status,
                }
            })
            .collect()
    }

    /// Whether any existing, readable target file lacks a rule token.
    pub fn needs_enforcement(&self) -> bool {
        self.compliance().iter().any(FileCompliance::needs_enforcement)
    }

    /// What the write phase would produce, without touching anything.
    pub fn preview(&self) -> Vec<FilePreview> {
        self.target_files
            .iter()
            .filter_map(|file| {
                let path = self.conf_dir.join(file);
                let original = self.read_target(&path).ok().flatten()?;
                let merge = self.merger.merge(&original);
                Some(FilePreview {
                    file: file.clone(),
                    path,
                    original,
                    merge,
                })
            })
            .collect()
    }

    /// Check compliance and run a cycle if needed.
    ///
    /// Returns [`TriggerOutcome::Queued`] immediately when another call in
    /// this process is already running; that call then performs one more
    /// check before returning. Also returns `Queued` when another process
    /// holds the cycle lock. The outcome reported is that of the first pass.
    pub async fn check_and_enforce(&self) -> TriggerOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.recheck.store(true, Ordering::Release);
            tracing::info!("Enforcement already in progress, re-check queued");
            return TriggerOutcome::Queued;
        }

        let first = self.locked_pass().await;

        loop {
            self.in_flight.store(false, Ordering::Release);

            // A trigger may have queued after the last pass drained the flag.
            if self.recheck.load(Ordering::Acquire)
                && self
                    .in_flight
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            {
                self.locked_pass().await;
                continue;
            }
            break;
        }

        first
    }

    /// One check plus every re-check queued meanwhile, under the cycle lock.
    ///
    /// The lock is released before the caller clears `in_flight`.
    async fn locked_pass(&self) -> TriggerOutcome {
        let _guard = match self.acquire_cycle_lock() {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };

        let first = self.check_once().await;
        while self.recheck.swap(false, Ordering::AcqRel) {
            tracing::info!("Running queued re-check");
            self.check_once().await;
        }
        first
    }

    /// `Err(Queued)` when another process holds the lock.
    ///
    /// A lock that cannot be created or taken for any other reason is
    /// logged and enforcement goes ahead unguarded.
    fn acquire_cycle_lock(&self) -> std::result::Result<Option<LockGuard>, TriggerOutcome> {
        let Some(lock) = &self.cycle_lock else {
            return Ok(None);
        };
        match lock.try_acquire() {
            Ok(Some(guard)) => Ok(Some(guard)),
            Ok(None) => {
                tracing::info!(
                    lock = %lock.path().display(),
                    "Another process is enforcing, skipping this check"
                );
                self.recheck.store(false, Ordering::Release);
                Err(TriggerOutcome::Queued)
            }
            Err(e) => {
                tracing::warn!("Cycle lock unavailable, continuing without it: {}", e);
                Ok(None)
            }
        }
    }

    async fn check_once(&self) -> TriggerOutcome {
        tracing::info!("Checking rules");
        if self.needs_enforcement() {
            tracing::info!("Rules missing, initiating enforcement cycle");
            TriggerOutcome::Enforced(Box::new(self.run_cycle().await))
        } else {
            tracing::info!("Rules present, no action needed");
            TriggerOutcome::Compliant
        }
    }

    /// Stop the application, repair every target file, restart it, notify.
    ///
    /// Always runs to the end; timeouts and failures are recorded in the
    /// report. Callers outside [`check_and_enforce`] must ensure no other
    /// cycle is running.
    ///
    /// [`check_and_enforce`]: Self::check_and_enforce
    pub async fn run_cycle(&self) -> CycleReport {
        self.set_phase(CyclePhase::Stopping);
        let stop = self.lifecycle.stop().await;

        self.set_phase(CyclePhase::AwaitingExit);
        let exit = self.lifecycle.await_exit().await;

        self.set_phase(CyclePhase::Settling);
        self.lifecycle.settle().await;

        self.set_phase(CyclePhase::Writing);
        let files = self.enforce_files();
        if files.iter().any(|f| matches!(f.outcome, FileOutcome::Updated(_))) {
            tracing::info!("Configuration updated");
        } else {
            tracing::info!("Configuration already correct (or write failed)");
        }

        self.set_phase(CyclePhase::Starting);
        let launch_error = self.lifecycle.start().await.err().map(|e| e.to_string());

        self.set_phase(CyclePhase::AwaitingStart);
        let start = self.lifecycle.await_start().await;

        self.set_phase(CyclePhase::Notifying);
        let notified = match &self.notifier {
            Some(notifier) => {
                notifier.send(REPAIR_TITLE, REPAIR_MESSAGE).await;
                true
            }
            None => false,
        };

        self.set_phase(CyclePhase::Idle);
        tracing::info!("Resuming configuration monitoring");

        CycleReport {
            stop,
            exit,
            files,
            launch_error,
            start,
            notified,
        }
    }

    /// Merge and persist every target file independently.
    pub fn enforce_files(&self) -> Vec<FileReport> {
        self.target_files
            .iter()
            .map(|file| {
                let path = self.conf_dir.join(file);
                let outcome = self.enforce_file(&path);
                FileReport {
                    file: file.clone(),
                    path,
                    outcome,
                }
            })
            .collect()
    }

    fn enforce_file(&self, path: &Path) -> FileOutcome {
        let original = match self.read_target(path) {
            Ok(Some(text)) => text,
            Ok(None) => return FileOutcome::Missing,
            Err(reason) => return FileOutcome::ReadFailed { reason },
        };

        let merge = self.merger.merge(&original);
        if !merge.changed {
            tracing::debug!(path = %path.display(), "Already compliant");
            return FileOutcome::Unchanged;
        }

        tracing::info!(
            path = %path.display(),
            created = ?merge.created,
            updated = ?merge.updated,
            "Repairing filter file"
        );
        match self.writer.write(path, &merge.text) {
            Ok(method) => FileOutcome::Updated(method),
            Err(e) => FileOutcome::WriteFailed {
                reason: e.to_string(),
            },
        }
    }

    /// `Ok(None)` when the file is absent, `Err` with a reason when unreadable.
    fn read_target(&self, path: &Path) -> std::result::Result<Option<String>, String> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "File not found, skipping");
            return Ok(None);
        }
        io::read_text(path).map(Some).map_err(|e| {
            tracing::warn!(path = %path.display(), "Error reading file: {}", e);
            e.to_string()
        })
    }

    fn set_phase(&self, phase: CyclePhase) {
        tracing::debug!(%phase, "Cycle phase");
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }
}
