//! Enforcement orchestration for syno-guard
//!
//! This crate ties the pure merge logic of `guard-content` and the
//! persistence layer of `guard-fs` to the running Synology Drive client:
//!
//! - [`watch`]: filesystem notifications and the debounce timer
//! - [`lifecycle`]: stopping and restarting the client with escalation
//! - [`enforce`]: the single-flight check-and-repair coordinator
//! - [`daemon`]: the long-running loop wiring the three together
//! - [`system`]: macOS implementations of the control and notification seams
//! - [`config`]: settings file and directory resolution

pub mod config;
pub mod daemon;
pub mod enforce;
pub mod error;
pub mod lifecycle;
pub mod notifier;
pub mod system;
pub mod watch;

pub use config::Settings;
pub use enforce::{
    CYCLE_LOCK_FILE, ComplianceStatus, CyclePhase, CycleReport, EnforcementCoordinator,
    FileCompliance, FileOutcome, FilePreview, FileReport, TriggerOutcome,
};
pub use error::{ControlError, Error, Result};
pub use lifecycle::{AppControl, ProcessLifecycle, Termination};
pub use notifier::Notifier;
