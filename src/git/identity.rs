use super::runner::Runner;
use anyhow::Result;

/// Author identity from git config. Unset keys come back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// The first config key that is unset, if any.
    pub fn missing_key(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("user.name")
        } else if self.email.is_empty() {
            Some("user.email")
        } else {
            None
        }
    }
}

/// GitHub CLI authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GhAuth {
    Authenticated,
    NotAuthenticated,
    /// `gh` is not installed or could not be started.
    Unavailable,
}

/// Read a git config value; an unset key yields an empty string.
pub fn config_value(runner: &dyn Runner, key: &str) -> Result<String> {
    let result = runner.git(&["config", key])?;
    if !result.success() {
        log::debug!("git config {} exited with {}", key, result.code);
    }
    Ok(result.stdout.trim().to_string())
}

pub fn author_identity(runner: &dyn Runner) -> Result<Identity> {
    Ok(Identity {
        name: config_value(runner, "user.name")?,
        email: config_value(runner, "user.email")?,
    })
}

/// Ask `gh auth status`. Never fails: a missing `gh` is just `Unavailable`.
pub fn gh_auth_status(runner: &dyn Runner) -> GhAuth {
    match runner.run_args("gh", &["auth", "status"]) {
        Ok(result) if result.success() => GhAuth::Authenticated,
        Ok(result) => {
            log::debug!("gh auth status: {}", result.stderr.trim());
            GhAuth::NotAuthenticated
        }
        Err(e) => {
            log::debug!("gh unavailable: {:#}", e);
            GhAuth::Unavailable
        }
    }
}
