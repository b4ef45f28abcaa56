//! Check identity, list changes, then stage, commit and push.

use super::{cancelled, ensure_repository, ensure_success, Outcome, WorkflowError};
use crate::console::Console;
use crate::git::identity::{self, GhAuth};
use crate::git::runner::Runner;
use crate::git::{commit, remote, status};
use anyhow::Result;

const PUSH_HINT: &str = "If the remote has new commits, run 'gitsync pull' first.";

#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Count and stage untracked files too (`git add -A` instead of `git add -u`).
    pub include_untracked: bool,
}

pub fn run(runner: &dyn Runner, console: &mut dyn Console, options: &PushOptions) -> Result<Outcome> {
    console.info("Checking repository status and authentication...");
    ensure_repository(runner)?;

    let author = identity::author_identity(runner)?;
    if let Some(key) = author.missing_key() {
        return Err(WorkflowError::MissingIdentity { key }.into());
    }
    match identity::gh_auth_status(runner) {
        GhAuth::Authenticated => {
            console.success(&format!("Authenticated with GitHub CLI as {}", author.name));
        }
        GhAuth::NotAuthenticated => {
            console.warn(&format!(
                "GitHub CLI is not authenticated, but Git is configured: {} <{}>",
                author.name, author.email
            ));
            console.hint("Pushing over SSH or with a stored token still works.");
        }
        GhAuth::Unavailable => {
            console.warn(&format!(
                "GitHub CLI (gh) is not available; Git is configured: {} <{}>",
                author.name, author.email
            ));
        }
    }

    let result = ensure_success(status::query_v1(runner)?, "git status --porcelain", None)?;
    let report = status::classify_porcelain_v1(&result.stdout);
    if !report.unmerged.is_empty() {
        let paths = report.unmerged_paths().iter().map(|p| p.to_string()).collect();
        return Err(WorkflowError::UnresolvedConflicts(paths).into());
    }

    let mut files = report.modified_family();
    if options.include_untracked {
        files.extend(report.untracked_paths());
    }
    if files.is_empty() {
        console.success("No modified tracked files to commit.");
        if !options.include_untracked && !report.untracked.is_empty() {
            console.hint("New files are not included; stage them with 'git add <file>' or rerun with --include-untracked.");
        } else {
            console.hint("If you created new files, add them with 'git add <file>' or 'git add .' and run again.");
        }
        return Ok(Outcome::NothingToCommit);
    }

    console.info("Changed files:");
    console.block(&files.join("\n"));
    if !console.confirm("Commit and push these files?")? {
        return Ok(cancelled(console, "push declined"));
    }

    let message = console.ask("Commit message: ")?;
    let message = message.trim();
    if message.is_empty() {
        console.error("Commit message cannot be empty.");
        return Ok(Outcome::Cancelled("empty commit message".to_string()));
    }

    let stage = if options.include_untracked { "git add -A" } else { "git add -u" };
    console.info("Staging changes...");
    ensure_success(commit::stage(runner, options.include_untracked)?, stage, None)?;

    console.info("Committing...");
    ensure_success(commit::commit(runner, message)?, "git commit", None)?;

    console.info("Pushing to the remote...");
    ensure_success(remote::push(runner)?, "git push", Some(PUSH_HINT))?;

    console.success("Changes pushed successfully.");
    Ok(Outcome::Completed)
}
