//! Application control through `osascript`, `pkill`, `pgrep` and `open`

use async_trait::async_trait;

use super::{applescript_string, run, run_checked};
use crate::error::ControlError;
use crate::lifecycle::{AppControl, Termination};

/// Controls the application with stock macOS commands.
#[derive(Debug, Clone)]
pub struct SystemAppControl {
    app_name: String,
}

impl SystemAppControl {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

/// `pkill`/`pgrep` exit status meaning "no process matched".
const NO_MATCH: i32 = 1;

#[async_trait]
impl AppControl for SystemAppControl {
    async fn request_quit(&self) -> Result<(), ControlError> {
        let script = format!("tell application {} to quit", applescript_string(&self.app_name));
        run_checked("osascript", &["-e", &script]).await
    }

    async fn terminate(&self, pattern: &str, mode: Termination) -> Result<(), ControlError> {
        let mut args = Vec::with_capacity(3);
        if mode == Termination::Kill {
            args.push("-9");
        }
        args.extend(["-f", pattern]);
        let status = run("pkill", &args).await?;
        if status.success() || status.code() == Some(NO_MATCH) {
            Ok(())
        } else {
            Err(ControlError::CommandFailed {
                command: "pkill".to_string(),
                status: status.to_string(),
            })
        }
    }

    async fn is_running(&self, pattern: &str) -> Result<bool, ControlError> {
        let status = run("pgrep", &["-f", pattern]).await?;
        match status.code() {
            Some(0) => Ok(true),
            Some(NO_MATCH) => Ok(false),
            _ => Err(ControlError::CommandFailed {
                command: "pgrep".to_string(),
                status: status.to_string(),
            }),
        }
    }

    async fn launch(&self) -> Result<(), ControlError> {
        run_checked("open", &["-a", &self.app_name]).await
    }
}
