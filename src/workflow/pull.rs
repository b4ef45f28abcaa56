//! Fetch, check for divergence, show what changed upstream, then pull.

use super::{cancelled, ensure_repository, ensure_success, Outcome, WorkflowError};
use crate::console::Console;
use crate::git::runner::Runner;
use crate::git::status::BranchInfo;
use crate::git::{branch, remote, status};
use anyhow::{bail, Result};

const CONFLICT_HINT: &str =
    "There may be merge conflicts. Resolve them manually, then commit or continue the rebase.";

#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Pull `<remote>/<branch>` instead of the branch's upstream.
    pub remote: Option<String>,
    /// Use `git pull --rebase` instead of a merge.
    pub rebase: bool,
}

pub fn run(runner: &dyn Runner, console: &mut dyn Console, options: &PullOptions) -> Result<Outcome> {
    console.info("Checking that this directory is a git repository...");
    ensure_repository(runner)?;

    let fetch_command = match &options.remote {
        Some(name) => {
            console.info(&format!("Fetching from '{}'...", name));
            format!("git fetch {}", name)
        }
        None => {
            console.info("Fetching from the upstream remote...");
            "git fetch".to_string()
        }
    };
    ensure_success(remote::fetch(runner, options.remote.as_deref())?, &fetch_command, None)?;

    let current = ensure_success(branch::current(runner)?, "git branch --show-current", None)?;
    let branch = current.stdout.trim().to_string();
    if branch.is_empty() {
        return Err(WorkflowError::DetachedHead.into());
    }

    let result = ensure_success(
        status::query_v2(runner)?,
        "git status --porcelain=v2 --branch",
        None,
    )?;
    let report = status::classify_porcelain_v2(&result.stdout);

    let target = match &options.remote {
        Some(name) => explicit_target(runner, &report.branch, name, &branch)?,
        None => report.branch,
    };
    let (Some(upstream), Some((ahead, behind))) = (target.upstream.clone(), target.ahead_behind) else {
        console.warn(&format!("Branch '{}' has no upstream; there is nothing to pull.", branch));
        console.hint(&format!(
            "Set one with: git branch --set-upstream-to=<remote>/{}, or pass --remote <name>",
            branch
        ));
        return Ok(Outcome::UpToDate);
    };

    if !target.diverged() {
        console.success("No new changes on the remote; the local branch is up to date.");
        return Ok(Outcome::UpToDate);
    }

    console.info(&format!(
        "'{}' is {} commit(s) ahead and {} commit(s) behind '{}'.",
        branch, ahead, behind, upstream
    ));
    let verb = if options.rebase { "rebased onto" } else { "merged into" };
    console.info(&format!("Changes from '{}' will be {} '{}'.", upstream, verb, branch));

    let diff = remote::diff_name_status(runner, &upstream)?;
    let question = if !diff.success() {
        console.warn(&format!("Could not list the changed files:\n{}", diff.stderr.trim()));
        "Pull the updates anyway?"
    } else if diff.stdout.trim().is_empty() {
        console.info("No file contents differ from the upstream; only the commit history has changed.");
        "Pull anyway to synchronise history?"
    } else {
        console.info("Files that differ from the upstream:");
        console.block(diff.stdout.trim_end());
        "Pull these updates into the local branch?"
    };
    if !console.confirm(question)? {
        return Ok(cancelled(console, "pull declined"));
    }

    let source = options.remote.as_deref().map(|name| (name, branch.as_str()));
    let command = format!("git {}", remote::pull_args(options.rebase, source).join(" "));
    console.info(&format!("Running '{}'...", command));
    let pulled = ensure_success(
        remote::pull(runner, options.rebase, source)?,
        &command,
        Some(CONFLICT_HINT),
    )?;

    console.success("Updates pulled successfully.");
    if !pulled.stdout.trim().is_empty() {
        console.block(pulled.stdout.trim_end());
    }
    Ok(Outcome::Completed)
}

/// Tracking info for `<remote>/<branch>`: taken from the status header when
/// the branch tracks exactly that ref, counted with `git rev-list` otherwise.
fn explicit_target(runner: &dyn Runner, info: &BranchInfo, name: &str, branch: &str) -> Result<BranchInfo> {
    let upstream = format!("{}/{}", name, branch);
    if info.upstream.as_deref() == Some(upstream.as_str()) && info.ahead_behind.is_some() {
        return Ok(info.clone());
    }
    let counted = ensure_success(
        remote::ahead_behind(runner, &upstream)?,
        &format!("git rev-list --left-right --count HEAD...{}", upstream),
        None,
    )?;
    let Some(counts) = remote::parse_ahead_behind(&counted.stdout) else {
        bail!("Unexpected output from git rev-list: {}", counted.stdout.trim());
    };
    Ok(BranchInfo {
        head: Some(branch.to_string()),
        upstream: Some(upstream),
        ahead_behind: Some(counts),
    })
}
