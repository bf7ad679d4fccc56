use crate::domain::{SigrunError, SigrunResult};
use std::path::Path;
use std::process::Command;

pub const DEFAULT_SUBMIT_COMMAND: &str = "sbatch";

/// Narrow seam around scheduler submission so the run loop can be exercised
/// with a stub instead of a live queue.
pub trait Submitter {
    fn submit(&self, script: &Path) -> SigrunResult<()>;
}

/// Submits by spawning `<command> <script-path>` and waiting for it. Stdio
/// is inherited so the scheduler's acknowledgement reaches the operator.
#[derive(Debug, Clone)]
pub struct SbatchSubmitter {
    command: String,
}

impl SbatchSubmitter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for SbatchSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_COMMAND)
    }
}

impl Submitter for SbatchSubmitter {
    fn submit(&self, script: &Path) -> SigrunResult<()> {
        let status = Command::new(&self.command)
            .arg(script)
            .status()
            .map_err(|source| SigrunError::SubmitLaunch {
                command: self.command.clone(),
                source,
            })?;

        if status.success() {
            return Ok(());
        }

        let status_text = status.code().map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit code {}", code),
        );
        Err(SigrunError::SubmitFailed {
            command: self.command.clone(),
            status: status_text,
        })
    }
}

/// Accepts every script without doing anything. Stands in for the scheduler
/// when only the rendered files are wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSubmitter;

impl Submitter for NullSubmitter {
    fn submit(&self, _script: &Path) -> SigrunResult<()> {
        Ok(())
    }
}
