use super::runner::{CommandResult, Runner};
use anyhow::Result;

/// Fetch from `remote`, or from the current branch's own remote when `None`.
pub fn fetch(runner: &dyn Runner, remote: Option<&str>) -> Result<CommandResult> {
    match remote {
        Some(remote) => runner.git(&["fetch", remote]),
        None => runner.git(&["fetch"]),
    }
}

/// Files that differ between HEAD and `upstream`, one `STATUS\tPATH` per line.
pub fn diff_name_status(runner: &dyn Runner, upstream: &str) -> Result<CommandResult> {
    runner.git(&["diff", "--name-status", "HEAD", upstream])
}

/// Commits on HEAD and on `upstream` that the other side lacks.
pub fn ahead_behind(runner: &dyn Runner, upstream: &str) -> Result<CommandResult> {
    let range = format!("HEAD...{}", upstream);
    runner.git(&["rev-list", "--left-right", "--count", &range])
}

/// Parse `rev-list --left-right --count` output: `AHEAD<TAB>BEHIND`.
pub fn parse_ahead_behind(output: &str) -> Option<(u32, u32)> {
    let mut counts = output.split_whitespace();
    let ahead = counts.next()?.parse().ok()?;
    let behind = counts.next()?.parse().ok()?;
    if counts.next().is_some() {
        return None;
    }
    Some((ahead, behind))
}

/// `git pull` arguments: the tracked upstream, or `remote branch` when given.
pub fn pull_args<'a>(rebase: bool, target: Option<(&'a str, &'a str)>) -> Vec<&'a str> {
    let mut args = vec!["pull"];
    if rebase {
        args.push("--rebase");
    }
    if let Some((remote, branch)) = target {
        args.push(remote);
        args.push(branch);
    }
    args
}

/// Pull, merging or rebasing.
pub fn pull(runner: &dyn Runner, rebase: bool, target: Option<(&str, &str)>) -> Result<CommandResult> {
    runner.git(&pull_args(rebase, target))
}

/// Push the current branch to its upstream.
pub fn push(runner: &dyn Runner) -> Result<CommandResult> {
    runner.git(&["push"])
}
