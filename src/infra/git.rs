//! Git subprocess helpers
//!
//! Thin wrappers around the `git` binary for the commit and import
//! workflows. Granite never reads git object data itself.

use std::path::Path;

use tokio::process::Command;

use crate::error::GitError;

async fn run_git(repo_dir: &Path, args: &[&str], operation: &str) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .await
        .map_err(|e| GitError::Spawn {
            error: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GitError::Failed {
            operation: operation.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `git status --porcelain`, optionally scoped to a path inside the repo.
/// Returns the raw porcelain output; empty means clean.
pub async fn status_porcelain(repo_dir: &Path, scope: Option<&Path>) -> Result<String, GitError> {
    let mut args = vec!["status", "--porcelain"];
    let scope_str;
    if let Some(scope) = scope {
        scope_str = scope.display().to_string();
        args.push(&scope_str);
    }
    run_git(repo_dir, &args, "status").await
}

/// `git status -s`, optionally scoped, for display
pub async fn status_short(repo_dir: &Path, scope: Option<&Path>) -> Result<String, GitError> {
    let mut args = vec!["status", "-s"];
    let scope_str;
    if let Some(scope) = scope {
        scope_str = scope.display().to_string();
        args.push(&scope_str);
    }
    run_git(repo_dir, &args, "status").await
}

/// `git diff --stat`, optionally scoped, for display
pub async fn diff_stat(repo_dir: &Path, scope: Option<&Path>) -> Result<String, GitError> {
    let mut args = vec!["diff", "--stat"];
    let scope_str;
    if let Some(scope) = scope {
        scope_str = scope.display().to_string();
        args.push(&scope_str);
    }
    run_git(repo_dir, &args, "diff").await
}

/// Stage a path
pub async fn add(repo_dir: &Path, path: &Path) -> Result<(), GitError> {
    run_git(repo_dir, &["add", &path.display().to_string()], "add").await?;
    Ok(())
}

/// Stage everything
pub async fn add_all(repo_dir: &Path) -> Result<(), GitError> {
    run_git(repo_dir, &["add", "-A"], "add").await?;
    Ok(())
}

/// Commit staged changes with a message
pub async fn commit(repo_dir: &Path, message: &str) -> Result<(), GitError> {
    run_git(repo_dir, &["commit", "-m", message], "commit").await?;
    Ok(())
}

/// Shallow-clone a repository into `dest`
pub async fn clone_shallow(url: &str, dest: &Path) -> Result<(), GitError> {
    let dest = dest.display().to_string();
    run_git(
        Path::new("."),
        &["clone", "--depth=1", url, &dest],
        "clone",
    )
    .await?;
    Ok(())
}
