use super::runner::{CommandResult, Runner};
use anyhow::Result;

/// Stage changes: everything including new files, or tracked files only.
pub fn stage(runner: &dyn Runner, include_untracked: bool) -> Result<CommandResult> {
    if include_untracked {
        runner.git(&["add", "-A"])
    } else {
        runner.git(&["add", "-u"])
    }
}

/// Commit staged changes. The message travels as a single argument, so
/// quotes and spaces need no escaping.
pub fn commit(runner: &dyn Runner, message: &str) -> Result<CommandResult> {
    runner.git(&["commit", "-m", message])
}
