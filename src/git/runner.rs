use super::decode::Decoder;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, or -1 when the process was killed by a signal.
    pub code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// How a command is handed to the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Interpreted by the platform shell. Quotes and spaces must be escaped
    /// by the caller.
    Shell(String),
    /// Passed straight to the process loader; every argument arrives intact.
    Argv { program: String, args: Vec<String> },
}

impl Invocation {
    pub fn argv(program: &str, args: &[&str]) -> Self {
        Invocation::Argv {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Shell(cmd) => write!(f, "{}", cmd),
            Invocation::Argv { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
        }
    }
}

/// Executes commands synchronously. A non-zero exit is reported through
/// `CommandResult::code`, never as an `Err`; `Err` means the process could
/// not be started at all.
pub trait Runner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Run a command line through the shell.
    fn run_shell(&self, cmd: &str) -> Result<CommandResult> {
        self.run(&Invocation::Shell(cmd.to_string()))
    }

    /// Run a program with a pre-tokenized argument list.
    fn run_args(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        self.run(&Invocation::argv(program, args))
    }

    fn git(&self, args: &[&str]) -> Result<CommandResult> {
        self.run_args("git", args)
    }
}

/// Runs real processes, optionally inside a specific directory.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    decoder: Decoder,
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new(decoder: Decoder) -> Self {
        Self { decoder, cwd: None }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = match invocation {
            Invocation::Shell(line) => shell_command(line),
            Invocation::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        };
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        log::debug!("$ {}", invocation);
        let output = self
            .command(invocation)
            .output()
            .with_context(|| format!("Failed to execute '{}'", invocation))?;

        let result = CommandResult {
            stdout: self.decoder.decode(&output.stdout),
            stderr: self.decoder.decode(&output.stderr),
            code: output.status.code().unwrap_or(-1),
        };
        if !result.success() {
            log::debug!("'{}' exited with {}", invocation, result.code);
        }
        Ok(result)
    }
}

#[cfg(unix)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

/// Minimum git version required (`git branch --show-current`).
const MIN_GIT_VERSION: (u32, u32, u32) = (2, 22, 0);

/// Parse a version string like "git version 2.39.3 (Apple Git-146)" into (major, minor, patch).
fn parse_git_version(version_str: &str) -> Option<(u32, u32, u32)> {
    let version_part = version_str
        .strip_prefix("git version ")
        .unwrap_or(version_str)
        .trim();
    let mut parts = version_part.split(|c: char| !c.is_ascii_digit()).filter(|s| !s.is_empty());
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    Some((major, minor, patch))
}

/// Check that the installed git version meets the minimum requirement (≥ 2.22.0).
pub fn check_git_version(runner: &dyn Runner) -> Result<()> {
    let output = runner.git(&["--version"])?;
    if !output.success() {
        bail!("'git --version' failed: {}", output.stderr.trim());
    }
    let version = parse_git_version(output.stdout.trim()).ok_or_else(|| {
        anyhow::anyhow!("Could not parse git version from: {}", output.stdout.trim())
    })?;
    let (min_major, min_minor, min_patch) = MIN_GIT_VERSION;
    if version < (min_major, min_minor, min_patch) {
        bail!(
            "Git version {}.{}.{} is too old (minimum: {}.{}.{})",
            version.0, version.1, version.2,
            min_major, min_minor, min_patch
        );
    }
    log::debug!("Git version {}.{}.{} OK", version.0, version.1, version.2);
    Ok(())
}
