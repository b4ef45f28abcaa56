use super::runner::{CommandResult, Runner};
use anyhow::Result;

/// Get the current branch name. Empty stdout means a detached HEAD.
pub fn current(runner: &dyn Runner) -> Result<CommandResult> {
    runner.git(&["branch", "--show-current"])
}
