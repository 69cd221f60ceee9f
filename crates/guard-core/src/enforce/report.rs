//! Outcome types for compliance checks and enforcement cycles

use std::fmt;
use std::path::PathBuf;

use guard_content::MergeOutcome;
use guard_fs::WriteMethod;

use crate::lifecycle::{ExitOutcome, StartOutcome, StopMethod};

/// Where a cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Stopping,
    AwaitingExit,
    Settling,
    Writing,
    Starting,
    AwaitingStart,
    Notifying,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Stopping => "stopping",
            Self::AwaitingExit => "awaiting-exit",
            Self::Settling => "settling",
            Self::Writing => "writing",
            Self::Starting => "starting",
            Self::AwaitingStart => "awaiting-start",
            Self::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Read-only compliance state of one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceStatus {
    /// Every rule token is present.
    Compliant,
    /// These tokens are absent from the file text.
    NonCompliant { missing: Vec<String> },
    /// The file does not exist; it is skipped.
    Missing,
    /// The file exists but could not be read; it is skipped.
    Unreadable { reason: String },
}

/// Compliance of one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCompliance {
    pub file: String,
    pub path: PathBuf,
    pub status: ComplianceStatus,
}

impl FileCompliance {
    pub fn needs_enforcement(&self) -> bool {
        matches!(self.status, ComplianceStatus::NonCompliant { .. })
    }
}

/// What happened to one target file during the write phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Updated(WriteMethod),
    /// Already satisfied the rule set; not rewritten.
    Unchanged,
    Missing,
    ReadFailed { reason: String },
    WriteFailed { reason: String },
}

/// Per-file result of the write phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Merge preview of one target file, for dry runs.
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub file: String,
    pub path: PathBuf,
    pub original: String,
    pub merge: MergeOutcome,
}

/// Everything one enforcement cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub stop: StopMethod,
    pub exit: ExitOutcome,
    pub files: Vec<FileReport>,
    /// Set when the launch request failed; the start wait still ran.
    pub launch_error: Option<String>,
    pub start: StartOutcome,
    pub notified: bool,
}

impl CycleReport {
    /// Whether any file was rewritten.
    pub fn updated_any(&self) -> bool {
        self.files
            .iter()
            .any(|f| matches!(f.outcome, FileOutcome::Updated(_)))
    }

    /// Whether every step finished without a fallback or failure.
    pub fn is_clean(&self) -> bool {
        self.stop == StopMethod::Graceful
            && matches!(self.exit, ExitOutcome::Confirmed { .. })
            && matches!(self.start, StartOutcome::Confirmed { .. })
            && self.launch_error.is_none()
            && !self.files.iter().any(|f| {
                matches!(
                    f.outcome,
                    FileOutcome::ReadFailed { .. } | FileOutcome::WriteFailed { .. }
                )
            })
    }
}

/// Result of one trigger of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// All files already satisfied the rule set.
    Compliant,
    /// A cycle ran.
    Enforced(Box<CycleReport>),
    /// Another cycle was active. In the same process a re-check was queued
    /// behind it; a cycle in another process was left to finish alone.
    Queued,
}
