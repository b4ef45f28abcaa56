pub mod error;
pub mod pull;
pub mod push;
pub mod status;

pub use error::WorkflowError;

use crate::git::runner::{CommandResult, Runner};
use anyhow::Result;

/// How a workflow ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    UpToDate,
    NothingToCommit,
    /// The user declined a prompt or gave an empty answer.
    Cancelled(String),
}

/// The first step of every workflow: `git status`, run through the shell,
/// must succeed.
fn ensure_repository(runner: &dyn Runner) -> Result<()> {
    let result = runner.run_shell("git status")?;
    if !result.success() {
        log::warn!("git status failed: {}", result.stderr.trim());
        return Err(WorkflowError::NotARepository.into());
    }
    Ok(())
}

/// Turn a non-zero exit into `WorkflowError::CommandFailed`.
fn ensure_success(
    result: CommandResult,
    command: &str,
    hint: Option<&'static str>,
) -> Result<CommandResult> {
    if result.success() {
        return Ok(result);
    }
    log::warn!("{} exited with {}", command, result.code);
    Err(WorkflowError::CommandFailed {
        command: command.to_string(),
        stderr: result.stderr,
        hint,
    }
    .into())
}

fn cancelled(console: &mut dyn crate::console::Console, reason: &str) -> Outcome {
    console.info("Cancelled by user.");
    Outcome::Cancelled(reason.to_string())
}
