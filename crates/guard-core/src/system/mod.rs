//! macOS implementations of the control and notification interfaces
//!
//! Each operation shells out to a stock system command: `osascript` for
//! quitting and notifications, `pkill`/`pgrep` for process handling and
//! `open` for launching.

mod app;
mod notification;

pub use app::SystemAppControl;
pub use notification::OsaScriptNotifier;

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::error::ControlError;

/// Run `program` with `args`, discarding output, and return its status.
async fn run(program: &str, args: &[&str]) -> Result<ExitStatus, ControlError> {
    tracing::debug!(program, ?args, "Running system command");
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|source| ControlError::Spawn {
            command: program.to_string(),
            source,
        })
}

/// Like [`run`] but any non-zero exit is an error.
async fn run_checked(program: &str, args: &[&str]) -> Result<(), ControlError> {
    let status = run(program, args).await?;
    if status.success() {
        Ok(())
    } else {
        Err(ControlError::CommandFailed {
            command: program.to_string(),
            status: status.to_string(),
        })
    }
}

/// Quote `value` as an AppleScript string literal.
fn applescript_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applescript_string_escapes() {
        assert_eq!(applescript_string("Drive"), "\"Drive\"");
        assert_eq!(applescript_string("a \"b\" \\c"), "\"a \\\"b\\\" \\\\c\"");
    }

    #[tokio::test]
    async fn test_run_reports_missing_program() {
        let err = run("/nonexistent/program", &[]).await.unwrap_err();
        assert!(matches!(err, ControlError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_checked_maps_exit_status() {
        assert!(run_checked("true", &[]).await.is_ok());
        assert!(matches!(
            run_checked("false", &[]).await,
            Err(ControlError::CommandFailed { .. })
        ));
    }
}
