//! Semantic workflow errors.
//!
//! Propagated through `anyhow`; `main` downcasts to print the hint.

/// Failures that end a workflow. A user declining a prompt is not one of
/// these; it is reported as `Outcome::Cancelled`.
#[derive(Debug)]
pub enum WorkflowError {
    /// The initial `git status` failed.
    NotARepository,
    /// An external command exited non-zero.
    CommandFailed {
        command: String,
        stderr: String,
        hint: Option<&'static str>,
    },
    /// `user.name` or `user.email` is empty.
    MissingIdentity { key: &'static str },
    /// `git branch --show-current` printed nothing.
    DetachedHead,
    UnresolvedConflicts(Vec<String>),
}

impl WorkflowError {
    pub fn hint(&self) -> Option<String> {
        match self {
            WorkflowError::NotARepository => Some(
                "Run 'git init' first or navigate to a git repository.".to_string(),
            ),
            WorkflowError::CommandFailed { hint, .. } => hint.map(str::to_string),
            WorkflowError::MissingIdentity { key } => {
                let example = if *key == "user.email" {
                    "you@example.com"
                } else {
                    "Your Name"
                };
                Some(format!("Set it with: git config --global {} \"{}\"", key, example))
            }
            WorkflowError::DetachedHead => {
                Some("Check out a branch with 'git switch <branch>' and run again.".to_string())
            }
            WorkflowError::UnresolvedConflicts(_) => Some(
                "Resolve the conflicts, stage the files with 'git add', then run again."
                    .to_string(),
            ),
        }
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowError::NotARepository => {
                write!(f, "Not a git repository (or any of the parent directories)")
            }
            WorkflowError::CommandFailed { command, stderr, .. } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    write!(f, "'{}' failed", command)
                } else {
                    write!(f, "'{}' failed:\n{}", command, stderr)
                }
            }
            WorkflowError::MissingIdentity { key } => {
                write!(f, "Git {} is not set", key)
            }
            WorkflowError::DetachedHead => {
                write!(f, "Could not determine the current branch (detached HEAD?)")
            }
            WorkflowError::UnresolvedConflicts(paths) => {
                write!(f, "Unresolved merge conflicts in: {}", paths.join(", "))
            }
        }
    }
}

impl std::error::Error for WorkflowError {}

/// Extract the workflow error from an anyhow chain, if there is one.
pub fn as_workflow_error(err: &anyhow::Error) -> Option<&WorkflowError> {
    err.downcast_ref::<WorkflowError>()
}
