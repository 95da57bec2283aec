//! Shared test harness for minigit-cli integration tests.
//!
//! Runs the compiled binary in a temp worktree with pinned identity and
//! date environment for deterministic output.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn assert_ok(&self) -> &Self {
        assert_eq!(
            self.exit_code, 0,
            "command failed\nstdout:\n{}\nstderr:\n{}",
            self.stdout, self.stderr
        );
        self
    }
}

/// Run the minigit binary in `dir` with pinned identity environment.
pub fn minigit(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_minigit"));
    cmd.args(args)
        .current_dir(dir)
        .env("AUTHOR_NAME", "Test Author")
        .env("AUTHOR_EMAIL", "author@example.com")
        .env("AUTHOR_DATE", "1234567890 +0000")
        .env("COMMITTER_NAME", "Test Committer")
        .env("COMMITTER_EMAIL", "committer@example.com")
        .env("COMMITTER_DATE", "1234567890 +0000")
        .env("TZ", "UTC");
    let output = cmd.output().expect("failed to run minigit");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Create a fresh initialized repository in a temp directory.
pub fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    minigit(dir.path(), &["init"]).assert_ok();
    dir
}

/// Write a file under the worktree, creating parent directories.
pub fn write_file(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

/// Read a worktree file to a string.
pub fn read_file(dir: &Path, path: &str) -> String {
    std::fs::read_to_string(dir.join(path)).unwrap()
}

/// Stage everything and commit with the given message; returns the commit
/// OID as printed by rev-parse.
pub fn commit_all(dir: &Path, message: &str) -> String {
    minigit(dir, &["add", "-A"]).assert_ok();
    minigit(dir, &["commit", "-m", message]).assert_ok();
    rev_parse(dir, "HEAD")
}

/// Resolve a revision to its full hex OID.
pub fn rev_parse(dir: &Path, rev: &str) -> String {
    let result = minigit(dir, &["rev-parse", rev]);
    result.assert_ok();
    result.stdout.trim().to_string()
}
