//! Elevated write helper
//!
//! Used only after an unprivileged write has been refused. The helper
//! receives the full content on stdin, so the caller never handles
//! credentials.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Writes bytes to a path with elevated rights.
pub trait PrivilegedWrite: Send + Sync {
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
}

/// Streams content through `sudo -n tee <path>`.
///
/// `-n` makes sudo fail instead of prompting, since the daemon has no
/// terminal to prompt on.
#[derive(Debug, Clone)]
pub struct SudoTee {
    program: String,
}

impl SudoTee {
    pub fn new() -> Self {
        Self {
            program: "sudo".to_string(),
        }
    }

    /// Use a different escalation program with the same `-n tee` calling
    /// convention.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SudoTee {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivilegedWrite for SudoTee {
    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        let elevated = |message: String| Error::Elevated {
            path: path.to_path_buf(),
            message,
        };

        let mut child = Command::new(&self.program)
            .args(["-n", "tee"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| elevated(format!("failed to spawn {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(content)
                .map_err(|e| elevated(format!("failed to stream content: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| elevated(format!("failed to wait for {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(elevated(if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                format!("{} exited with {}: {}", self.program, output.status, stderr)
            }));
        }

        Ok(())
    }
}
