//! Thin `git` shell-out helpers. No `git2` dependency: every operation
//! is a `std::process::Command` invocation against the project's own
//! working tree, the same plumbing style as the teacher's worktree RAII
//! guard, generalized from a disposable worktree to direct commits.

use crate::error::{CheckpointError, CheckpointResult};
use std::path::Path;
use std::process::Command;

fn run(repo: &Path, args: &[&str]) -> CheckpointResult<std::process::Output> {
    let output = Command::new("git").current_dir(repo).args(args).output()?;
    Ok(output)
}

fn require_success(command: &str, output: std::process::Output) -> CheckpointResult<std::process::Output> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(CheckpointError::GitFailed {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// `git add -A`.
pub(crate) fn add_all(repo: &Path) -> CheckpointResult<()> {
    require_success("add", run(repo, &["add", "-A"])?)?;
    Ok(())
}

/// `git commit --allow-empty -m <message>`, returning the new commit's
/// hash. `--allow-empty` lets a checkpoint taken with no working-tree
/// changes still produce a distinct, citable commit.
pub(crate) fn commit_allow_empty(repo: &Path, message: &str) -> CheckpointResult<String> {
    require_success("commit", run(repo, &["commit", "--allow-empty", "-m", message])?)?;
    let output = require_success("rev-parse", run(repo, &["rev-parse", "HEAD"])?)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `git reset --hard <commit_hash>`, restoring the working tree to a
/// prior checkpoint's commit.
pub(crate) fn reset_hard(repo: &Path, commit_hash: &str) -> CheckpointResult<()> {
    require_success("reset", run(repo, &["reset", "--hard", commit_hash])?)?;
    Ok(())
}
