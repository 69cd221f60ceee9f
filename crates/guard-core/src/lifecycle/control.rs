//! Application-control capability

use std::fmt;

use async_trait::async_trait;

use crate::error::ControlError;

/// How hard to terminate matching processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Ask the processes to exit (SIGTERM).
    Term,
    /// Kill unconditionally (SIGKILL).
    Kill,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term => write!(f, "term"),
            Self::Kill => write!(f, "kill"),
        }
    }
}

/// Operations the lifecycle needs from the operating system.
#[async_trait]
pub trait AppControl: Send + Sync {
    /// Ask the application to quit through its own UI.
    async fn request_quit(&self) -> Result<(), ControlError>;

    /// Terminate every process whose command line matches `pattern`.
    ///
    /// Finding nothing to terminate is not an error.
    async fn terminate(&self, pattern: &str, mode: Termination) -> Result<(), ControlError>;

    /// Whether any process matching `pattern` is running.
    async fn is_running(&self, pattern: &str) -> Result<bool, ControlError>;

    /// Launch the application.
    async fn launch(&self) -> Result<(), ControlError>;
}
