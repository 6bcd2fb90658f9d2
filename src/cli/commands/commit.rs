//! Commit command implementation
//!
//! Implements `granite commit`: walks packages with uncommitted changes and
//! commits each one individually, then offers a commit for any remaining
//! repository-level changes.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::workspace::{Package, Workspace};
use crate::infra::git;

/// Execute the commit command
pub async fn execute(project_dir: &Path) -> Result<()> {
    output::section("Granite Commit");

    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;

    let mut packages_with_changes: Vec<&Package> = Vec::new();
    for pkg in &workspace.packages {
        let scope = package_rel_dir(&workspace, pkg);
        match git::status_porcelain(project_dir, Some(scope.as_path())).await {
            Ok(status) if !status.is_empty() => packages_with_changes.push(pkg),
            Ok(_) => {}
            Err(e) => {
                output::warning(&format!(
                    "Failed to check git status for {}: {e}",
                    pkg.name
                ));
            }
        }
    }
    output::info(&format!(
        "Found {} packages with changes",
        packages_with_changes.len()
    ));

    let has_repo_changes = repo_level_changes(project_dir, &workspace).await;

    if packages_with_changes.is_empty() && !has_repo_changes {
        output::success("No changes to commit");
        return Ok(());
    }

    for pkg in packages_with_changes {
        commit_package(project_dir, &workspace, pkg).await;
    }

    if has_repo_changes {
        commit_repo(project_dir).await;
    }

    output::success("Commit process completed");
    Ok(())
}

fn package_rel_dir(workspace: &Workspace, pkg: &Package) -> PathBuf {
    pkg.dir()
        .strip_prefix(&workspace.root)
        .unwrap_or(pkg.dir())
        .to_path_buf()
}

/// True when the working tree holds changes outside every package directory
async fn repo_level_changes(project_dir: &Path, workspace: &Workspace) -> bool {
    let status = match git::status_porcelain(project_dir, None).await {
        Ok(status) => status,
        Err(e) => {
            output::warning(&format!("Failed to check git status: {e}"));
            return false;
        }
    };

    let package_dirs: Vec<PathBuf> = workspace
        .packages
        .iter()
        .map(|pkg| package_rel_dir(workspace, pkg))
        .collect();

    status.lines().any(|line| {
        if line.len() <= 3 {
            return false;
        }
        let file_path = Path::new(line[3..].trim());
        !package_dirs.iter().any(|dir| file_path.starts_with(dir))
    })
}

fn prompt(message: &str) -> Option<String> {
    output::info(message);
    print!("> ");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}

async fn commit_package(project_dir: &Path, workspace: &Workspace, pkg: &Package) {
    let scope = package_rel_dir(workspace, pkg);
    output::section(&format!("Package: {}", pkg.name));

    match git::status_short(project_dir, Some(scope.as_path())).await {
        Ok(status) => {
            output::detail("Changes:");
            output::detail(&status);
        }
        Err(e) => {
            output::error(&format!("Failed to get status for {}: {e}", pkg.name));
            return;
        }
    }

    match git::diff_stat(project_dir, Some(scope.as_path())).await {
        Ok(diff) if !diff.is_empty() => {
            output::detail("Diff summary:");
            output::detail(&diff);
        }
        Ok(_) => {}
        Err(e) => output::warning(&format!("Failed to get diff for {}: {e}", pkg.name)),
    }

    let Some(message) = prompt(&format!(
        "Enter commit message for {} (or 'skip' to skip):",
        pkg.name
    )) else {
        return;
    };
    if message == "skip" || message.is_empty() {
        output::info("Skipping commit for this package");
        return;
    }

    if let Err(e) = git::add(project_dir, &scope).await {
        output::error(&format!("Failed to stage changes for {}: {e}", pkg.name));
        return;
    }
    let commit_message = format!("{}: {message}", pkg.name);
    if let Err(e) = git::commit(project_dir, &commit_message).await {
        output::error(&format!("Failed to commit changes for {}: {e}", pkg.name));
        return;
    }

    output::success(&format!("Committed changes for {}", pkg.name));
}

async fn commit_repo(project_dir: &Path) {
    output::section("Repository Changes");

    match git::status_short(project_dir, None).await {
        Ok(status) => {
            output::detail("Changes:");
            output::detail(&status);
        }
        Err(e) => {
            output::error(&format!("Failed to get repo status: {e}"));
            return;
        }
    }

    let Some(message) = prompt("Enter commit message for repository changes (or 'skip' to skip):")
    else {
        return;
    };
    if message == "skip" || message.is_empty() {
        output::info("Skipping repository commit");
        return;
    }

    if let Err(e) = git::add_all(project_dir).await {
        output::error(&format!("Failed to stage repository changes: {e}"));
        return;
    }
    if let Err(e) = git::commit(project_dir, &message).await {
        output::error(&format!("Failed to commit repository changes: {e}"));
        return;
    }

    output::success("Committed repository changes");
}
