//! Scripted fakes for the application-control and notification seams.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use guard_content::{ConfigMerger, RuleSet};
use guard_core::lifecycle::{AppProfile, Timings};
use guard_core::{
    AppControl, ControlError, EnforcementCoordinator, Notifier, ProcessLifecycle, Termination,
};
use guard_fs::{BackupStore, PersistenceWriter, PrivilegedWrite};
use guard_test_utils::ConfDir;

pub const TRACKED: &str = "cloud-drive-daemon";
pub const UI: &str = "cloud-drive-ui";

/// Shared, ordered record of everything the fakes were asked to do.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// How the fake application reacts.
#[derive(Debug, Clone)]
pub struct Script {
    /// Polls that still see the process after a quit or SIGTERM. `None`
    /// means it only goes away on SIGKILL.
    pub exit_after_polls: Option<usize>,
    /// Polls that still miss the process after launch. `None` means it
    /// never shows up.
    pub start_after_polls: Option<usize>,
    pub quit_fails: bool,
    pub launch_fails: bool,
    /// Leading presence queries that fail.
    pub presence_errors: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            exit_after_polls: Some(2),
            start_after_polls: Some(2),
            quit_fails: false,
            launch_fails: false,
            presence_errors: 0,
        }
    }
}

#[derive(Debug)]
struct State {
    running: bool,
    /// Remaining polls before `running` flips to the second field.
    pending: Option<(usize, bool)>,
    presence_errors: usize,
}

/// [`AppControl`] driven by a [`Script`].
///
/// When `observe` is set, the file's content is captured at every quit
/// request and launch so tests can tell when the write happened.
pub struct FakeAppControl {
    script: Script,
    state: Mutex<State>,
    log: CallLog,
    observe: Option<PathBuf>,
    snapshots: Mutex<Vec<(String, String)>>,
}

impl FakeAppControl {
    pub fn new(script: Script, log: CallLog) -> Self {
        Self {
            state: Mutex::new(State {
                running: true,
                pending: None,
                presence_errors: script.presence_errors,
            }),
            script,
            log,
            observe: None,
            snapshots: Mutex::new(Vec::new()),
        }
    }

    pub fn observing(mut self, path: &Path) -> Self {
        self.observe = Some(path.to_path_buf());
        self
    }

    pub fn snapshots(&self) -> Vec<(String, String)> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn is_up(&self) -> bool {
        self.state.lock().unwrap().running
    }

    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }

    fn snapshot(&self, label: &str) {
        if let Some(path) = &self.observe {
            let content = std::fs::read_to_string(path).unwrap_or_default();
            self.snapshots.lock().unwrap().push((label.to_string(), content));
        }
    }

    fn schedule_exit(&self) {
        let mut state = self.state.lock().unwrap();
        state.pending = self.script.exit_after_polls.map(|n| (n, false));
    }

    fn failure(command: &str) -> ControlError {
        ControlError::CommandFailed {
            command: command.to_string(),
            status: "exit status: 1".to_string(),
        }
    }
}

#[async_trait]
impl AppControl for FakeAppControl {
    async fn request_quit(&self) -> Result<(), ControlError> {
        self.record("quit".to_string());
        self.snapshot("quit");
        if self.script.quit_fails {
            return Err(Self::failure("osascript"));
        }
        self.schedule_exit();
        Ok(())
    }

    async fn terminate(&self, pattern: &str, mode: Termination) -> Result<(), ControlError> {
        self.record(format!("terminate {mode} {pattern}"));
        match mode {
            Termination::Term => self.schedule_exit(),
            Termination::Kill => {
                let mut state = self.state.lock().unwrap();
                state.running = false;
                state.pending = None;
            }
        }
        Ok(())
    }

    async fn is_running(&self, pattern: &str) -> Result<bool, ControlError> {
        self.record(format!("poll {pattern}"));
        let mut state = self.state.lock().unwrap();
        if state.presence_errors > 0 {
            state.presence_errors -= 1;
            return Err(Self::failure("pgrep"));
        }
        if let Some((remaining, target)) = state.pending {
            if remaining == 0 {
                state.running = target;
                state.pending = None;
            } else {
                state.pending = Some((remaining - 1, target));
            }
        }
        Ok(state.running)
    }

    async fn launch(&self) -> Result<(), ControlError> {
        self.record("launch".to_string());
        self.snapshot("launch");
        if self.script.launch_fails {
            return Err(Self::failure("open"));
        }
        let mut state = self.state.lock().unwrap();
        state.pending = self.script.start_after_polls.map(|n| (n, true));
        Ok(())
    }
}

/// [`Notifier`] that appends to the shared call log.
pub struct RecordingNotifier {
    log: CallLog,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, title: &str, message: &str) {
        self.log.lock().unwrap().push("notify".to_string());
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Elevated helper that must never be needed in these suites.
pub struct NoElevation;

impl PrivilegedWrite for NoElevation {
    fn write(&self, path: &Path, _content: &[u8]) -> guard_fs::Result<()> {
        Err(guard_fs::Error::Elevated {
            path: path.to_path_buf(),
            message: "elevation not available in tests".to_string(),
        })
    }
}

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Calls recorded so far, excluding presence polls.
pub fn actions(log: &CallLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|call| !call.starts_with("poll"))
        .cloned()
        .collect()
}

pub fn count(log: &CallLog, call: &str) -> usize {
    log.lock().unwrap().iter().filter(|c| *c == call).count()
}

pub fn profile() -> AppProfile {
    AppProfile {
        tracked_process: TRACKED.to_string(),
        kill_patterns: vec![TRACKED.to_string(), UI.to_string()],
    }
}

pub fn timings() -> Timings {
    Timings {
        poll_interval: Duration::from_secs(1),
        exit_timeout: Duration::from_secs(10),
        settle: Duration::from_secs(1),
        start_timeout: Duration::from_secs(8),
    }
}

/// Real-time friendly bounds for tests that cannot pause the clock.
pub fn fast_timings() -> Timings {
    Timings {
        poll_interval: Duration::from_millis(20),
        exit_timeout: Duration::from_millis(500),
        settle: Duration::from_millis(20),
        start_timeout: Duration::from_millis(500),
    }
}

pub fn lifecycle(control: Arc<FakeAppControl>) -> ProcessLifecycle {
    ProcessLifecycle::new(control, profile(), timings())
}

/// Coordinator over `conf` with the default rule set and both target files.
pub fn coordinator(conf: &ConfDir, control: Arc<FakeAppControl>) -> EnforcementCoordinator {
    coordinator_with(conf, control, timings())
}

pub fn coordinator_with(
    conf: &ConfDir,
    control: Arc<FakeAppControl>,
    timings: Timings,
) -> EnforcementCoordinator {
    EnforcementCoordinator::new(
        conf.path(),
        vec!["blacklist.filter".to_string(), "filter-v4150".to_string()],
        ConfigMerger::new(RuleSet::defaults()),
        PersistenceWriter::with_elevated(BackupStore::new(conf.backup_dir()), NoElevation),
        ProcessLifecycle::new(control, profile(), timings),
    )
}
