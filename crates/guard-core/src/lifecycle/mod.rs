//! Stopping and restarting the monitored application
//!
//! [`ProcessLifecycle`] drives the stop → await exit → settle → start →
//! await start sequence around a write. All interaction with the real
//! application goes through the narrow [`AppControl`] trait, so the timeout
//! and escalation rules can be exercised against a scripted fake.

mod control;
mod process;

pub use control::{AppControl, Termination};
pub use process::{AppProfile, ExitOutcome, ProcessLifecycle, StartOutcome, StopMethod, Timings};
