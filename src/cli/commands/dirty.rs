//! Dirty command implementation
//!
//! Implements `granite dirty`: lists packages whose own files changed since
//! their last successful build. Propagation to dependents happens only in
//! `granite build --dirty`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::cache::FsStore;
use crate::core::dirty;
use crate::core::workspace::Workspace;

/// Execute the dirty command
pub async fn execute(project_dir: &Path) -> Result<()> {
    output::section("Loading Packages");
    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;
    output::success(&format!("Loaded {} packages", workspace.packages.len()));

    output::section("Checking for Changes");
    let store = FsStore::new(workspace.cache_dir());
    let dirty_packages = dirty::directly_dirty(&workspace.packages, &store);

    for (name, reason) in &dirty_packages {
        output::detail(&format!("{name}: {reason}"));
    }

    output::section("Results");
    if dirty_packages.is_empty() {
        output::success("No dirty packages found");
    } else {
        output::info(&format!("Found {} dirty packages:", dirty_packages.len()));
        for (name, _) in &dirty_packages {
            output::detail(name);
        }
    }
    Ok(())
}
