//! Read-only summary of the working tree and upstream tracking.

use super::{Outcome, WorkflowError};
use crate::console::Console;
use crate::git::runner::Runner;
use crate::git::status;
use anyhow::Result;

pub fn run(runner: &dyn Runner, console: &mut dyn Console) -> Result<Outcome> {
    let result = status::query_v2(runner)?;
    if !result.success() {
        log::warn!("git status failed: {}", result.stderr.trim());
        return Err(WorkflowError::NotARepository.into());
    }
    let report = status::classify_porcelain_v2(&result.stdout);

    let branch = &report.branch;
    match &branch.head {
        Some(head) => console.info(&format!("On branch {}", head)),
        None => console.warn("HEAD is detached"),
    }
    match (&branch.upstream, branch.ahead_behind) {
        (Some(upstream), Some((0, 0))) => {
            console.success(&format!("Up to date with '{}'", upstream));
        }
        (Some(upstream), Some((ahead, behind))) => console.info(&format!(
            "Diverged from '{}': {} ahead, {} behind",
            upstream, ahead, behind
        )),
        (Some(upstream), None) => console.warn(&format!("Upstream '{}' is gone", upstream)),
        (None, _) => console.info("No upstream configured"),
    }

    if report.is_clean() {
        console.success("Working tree clean");
    }
    for (category, paths) in report.by_category() {
        console.info(&format!("{} ({}):", category.label(), paths.len()));
        console.block(&paths.join("\n"));
    }
    for ignored in &report.ignored {
        log::debug!("not classified ({:?}): {}", ignored.reason, ignored.line);
    }
    Ok(Outcome::Completed)
}
