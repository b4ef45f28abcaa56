//! Integration tests for gitsync — uses real git repos in temp directories.
//!
//! Each test builds a bare "remote" plus one or two clones and drives the
//! gitsync binary against them, answering prompts through stdin.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Helper: run git in a specific directory and return stdout.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Helper: run gitsync in `dir`, feeding `input` to stdin.
fn gitsync(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .args(args)
        .current_dir(dir)
        .env("GITSYNC_CONFIG", dir.join("no-such-gitsync-config.toml"))
        .env_remove("GITSYNC_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run gitsync");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// A bare remote and a working clone with one pushed commit.
struct Fixture {
    _root: TempDir,
    remote: PathBuf,
    work: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let remote = root.path().join("remote.git");
        let work = root.path().join("work");
        std::fs::create_dir_all(&work).unwrap();

        git(root.path(), &["init", "--bare", "-b", "main", remote.to_str().unwrap()]);
        git(&work, &["init", "-b", "main"]);
        configure_identity(&work);
        std::fs::write(work.join("README.md"), "# Test\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "initial commit"]);
        git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&work, &["push", "-u", "origin", "main"]);

        Fixture {
            _root: root,
            remote,
            work,
        }
    }

    /// A second clone of the remote, with identity configured.
    fn clone(&self, name: &str) -> PathBuf {
        let parent = self.work.parent().unwrap();
        let dir = parent.join(name);
        git(parent, &["clone", self.remote.to_str().unwrap(), dir.to_str().unwrap()]);
        configure_identity(&dir);
        dir
    }
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
}

// ────────────────────────────────────────────────────────────────────────
// Porcelain output the classifier depends on
// ────────────────────────────────────────────────────────────────────────

#[test]
fn test_porcelain_v2_branch_headers() {
    let fx = Fixture::new();
    let output = git(&fx.work, &["status", "--porcelain=v2", "--branch"]);
    assert!(output.contains("# branch.head main"));
    assert!(output.contains("# branch.upstream origin/main"));
    assert!(output.contains("# branch.ab +0 -0"));
}

#[test]
fn test_porcelain_v1_codes() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("README.md"), "# Modified\n").unwrap();
    std::fs::write(fx.work.join("new.txt"), "content").unwrap();
    std::fs::write(fx.work.join("staged.txt"), "content").unwrap();
    git(&fx.work, &["add", "staged.txt"]);
    let output = git(&fx.work, &["status", "--porcelain"]);
    assert!(output.lines().any(|l| l == " M README.md"), "{}", output);
    assert!(output.lines().any(|l| l == "A  staged.txt"), "{}", output);
    assert!(output.lines().any(|l| l == "?? new.txt"), "{}", output);
}

// ────────────────────────────────────────────────────────────────────────
// status
// ────────────────────────────────────────────────────────────────────────

#[test]
fn test_status_command() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("README.md"), "# Modified\n").unwrap();
    std::fs::write(fx.work.join("notes.txt"), "hello").unwrap();

    let output = gitsync(&fx.work, &["status"], "");
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("On branch main"));
    assert!(out.contains("Up to date with 'origin/main'"));
    assert!(out.contains("modified (1):"));
    assert!(out.contains("README.md"));
    assert!(out.contains("untracked (1):"));
    assert!(out.contains("notes.txt"));
}

#[test]
fn test_status_shows_quoted_paths_unescaped() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("a b.txt"), "spaces").unwrap();
    std::fs::write(fx.work.join("документ.txt"), "cyrillic").unwrap();
    std::fs::write(fx.work.join("café.md"), "latin").unwrap();

    let output = gitsync(&fx.work, &["status"], "");

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("untracked (3):"), "{}", out);
    for name in ["a b.txt", "документ.txt", "café.md"] {
        assert!(out.lines().any(|l| l.trim() == name), "{} missing in {}", name, out);
    }
    assert!(!out.contains("\\3"), "{}", out);
}

// ────────────────────────────────────────────────────────────────────────
// push
// ────────────────────────────────────────────────────────────────────────

#[test]
fn test_push_commits_message_verbatim() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("README.md"), "# Changed\n").unwrap();
    let message = r#"Update "README" with it's new  title"#;

    let output = gitsync(&fx.work, &["push"], &format!("y\n{}\n", message));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("pushed successfully"));
    assert_eq!(git(&fx.work, &["log", "-1", "--format=%s"]).trim(), message);
    let remote_subject = git(&fx.remote, &["log", "-1", "--format=%s", "main"]);
    assert_eq!(remote_subject.trim(), message);
}

#[test]
fn test_push_declined_with_empty_answer() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("README.md"), "# Changed\n").unwrap();

    let output = gitsync(&fx.work, &["push"], "\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Cancelled"));
    assert_eq!(git(&fx.work, &["rev-list", "--count", "HEAD"]).trim(), "1");
    assert!(git(&fx.work, &["status", "--porcelain"]).contains(" M README.md"));
}

#[test]
fn test_push_skips_untracked_by_default() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("scratch.txt"), "draft").unwrap();

    let output = gitsync(&fx.work, &["push"], "");

    assert!(output.status.success());
    assert!(stdout(&output).contains("No modified tracked files"));
    assert_eq!(git(&fx.work, &["rev-list", "--count", "HEAD"]).trim(), "1");
}

#[test]
fn test_push_include_untracked() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("scratch.txt"), "draft").unwrap();

    let output = gitsync(&fx.work, &["push", "--include-untracked"], "y\nAdd scratch\n");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let files = git(&fx.remote, &["show", "--name-only", "--format=", "main"]);
    assert_eq!(files.trim(), "scratch.txt");
}

#[test]
fn test_push_lists_renamed_path_with_spaces() {
    let fx = Fixture::new();
    std::fs::write(fx.work.join("old name.txt"), "content\n").unwrap();
    git(&fx.work, &["add", "."]);
    git(&fx.work, &["commit", "-m", "add file"]);
    git(&fx.work, &["mv", "old name.txt", "new name.txt"]);

    let output = gitsync(&fx.work, &["push"], "\n");

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.lines().any(|l| l.trim() == "new name.txt"), "{}", out);
    assert!(!out.contains("\"new name.txt\""), "{}", out);
}

#[test]
fn test_push_without_identity() {
    let fx = Fixture::new();
    git(&fx.work, &["config", "--unset", "user.email"]);
    std::fs::write(fx.work.join("README.md"), "# Changed\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .arg("push")
        .current_dir(&fx.work)
        .env("GITSYNC_CONFIG", fx.work.join("absent.toml"))
        // Keep global/system config out of the identity lookup.
        .env("GIT_CONFIG_GLOBAL", fx.work.join("absent-gitconfig"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("EMAIL", "")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run gitsync");

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("user.email is not set"), "{}", err);
    assert!(stdout(&output).contains("git config --global user.email"));
}

// ────────────────────────────────────────────────────────────────────────
// pull
// ────────────────────────────────────────────────────────────────────────

#[test]
fn test_pull_when_up_to_date() {
    let fx = Fixture::new();
    let output = gitsync(&fx.work, &["pull"], "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("up to date"));
}

#[test]
fn test_pull_brings_in_remote_changes() {
    let fx = Fixture::new();
    let other = fx.clone("other");
    std::fs::write(other.join("CHANGELOG.md"), "- first\n").unwrap();
    git(&other, &["add", "."]);
    git(&other, &["commit", "-m", "add changelog"]);
    git(&other, &["push"]);

    let output = gitsync(&fx.work, &["pull"], "y\n");

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("0 commit(s) ahead and 1 commit(s) behind"), "{}", out);
    assert!(out.contains("CHANGELOG.md"), "{}", out);
    assert!(fx.work.join("CHANGELOG.md").exists());
}

#[test]
fn test_pull_declined_leaves_branch_behind() {
    let fx = Fixture::new();
    let other = fx.clone("other");
    std::fs::write(other.join("CHANGELOG.md"), "- first\n").unwrap();
    git(&other, &["add", "."]);
    git(&other, &["commit", "-m", "add changelog"]);
    git(&other, &["push"]);

    let output = gitsync(&fx.work, &["pull"], "\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Cancelled"));
    assert!(!fx.work.join("CHANGELOG.md").exists());
}

#[test]
fn test_pull_follows_upstream_not_named_origin() {
    let fx = Fixture::new();
    git(&fx.work, &["remote", "rename", "origin", "upstream"]);
    let other = fx.clone("other");
    std::fs::write(other.join("CHANGELOG.md"), "- first\n").unwrap();
    git(&other, &["add", "."]);
    git(&other, &["commit", "-m", "add changelog"]);
    git(&other, &["push"]);

    let output = gitsync(&fx.work, &["pull"], "y\n");

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("1 commit(s) behind 'upstream/main'"), "{}", out);
    assert!(fx.work.join("CHANGELOG.md").exists());
}

#[test]
fn test_pull_from_explicit_remote() {
    let fx = Fixture::new();
    let fork = fx.remote.with_file_name("fork.git");
    let root = fx.remote.parent().unwrap();
    git(root, &["clone", "--bare", fx.remote.to_str().unwrap(), fork.to_str().unwrap()]);
    let other = fx.clone("other");
    std::fs::write(other.join("FORK.md"), "from the fork\n").unwrap();
    git(&other, &["add", "."]);
    git(&other, &["commit", "-m", "fork only"]);
    git(&other, &["push", fork.to_str().unwrap(), "main"]);
    git(&fx.work, &["remote", "add", "fork", fork.to_str().unwrap()]);

    // origin/main is even with main; only the fork has the new commit.
    let output = gitsync(&fx.work, &["pull", "--remote", "fork"], "y\n");

    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("1 commit(s) behind 'fork/main'"), "{}", out);
    assert!(out.contains("FORK.md"), "{}", out);
    assert!(fx.work.join("FORK.md").exists());
}

// ────────────────────────────────────────────────────────────────────────
// CLI flag tests (binary invocation)
// ────────────────────────────────────────────────────────────────────────

#[test]
fn test_cli_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .arg("--version")
        .output()
        .expect("failed to run gitsync");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gitsync"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(output.status.success());
}

#[test]
fn test_cli_help_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .arg("--help")
        .output()
        .expect("failed to run gitsync");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("USAGE"));
    assert!(stdout.contains("COMMANDS"));
    assert!(stdout.contains("--verbose"));
    assert!(output.status.success());
}

#[test]
fn test_cli_unknown_flag_errors() {
    let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .args(["--nonexistent", "pull"])
        .output()
        .expect("failed to run gitsync");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unknown option"));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_not_git_repo() {
    let dir = TempDir::new().unwrap(); // NOT a git repo
    for command in ["pull", "push", "status"] {
        let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
            .arg(command)
            .current_dir(dir.path())
            .env("GITSYNC_CONFIG", dir.path().join("absent.toml"))
            // Keep an enclosing repository (e.g. under $TMPDIR) from being found.
            .env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap())
            .stdin(Stdio::null())
            .output()
            .expect("failed to run gitsync");
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Not a git repository"), "{}: {}", command, stderr);
        assert_eq!(output.status.code(), Some(1));
    }
}

#[test]
fn test_cli_directory_flag() {
    let fx = Fixture::new();
    let elsewhere = TempDir::new().unwrap();
    let output = gitsync(elsewhere.path(), &["-C", fx.work.to_str().unwrap(), "status"], "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("On branch main"));
}

#[test]
fn test_cli_config_command_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[pull]\nrebase = true\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_gitsync"))
        .arg("config")
        .env("GITSYNC_CONFIG", &path)
        .output()
        .expect("failed to run gitsync");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(output.status.success());
    assert!(stdout.contains("rebase = true"));
    assert!(stdout.contains("encodings = ["));
    assert!(!stdout.contains("remote ="));
}
