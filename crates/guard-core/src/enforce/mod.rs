//! Compliance checks and the enforcement cycle

mod coordinator;
mod report;

pub use coordinator::{CYCLE_LOCK_FILE, EnforcementCoordinator};
pub use report::{
    ComplianceStatus, CyclePhase, CycleReport, FileCompliance, FileOutcome, FilePreview,
    FileReport, TriggerOutcome,
};
