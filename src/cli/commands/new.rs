//! New command implementation
//!
//! Implements `granite new type` and `granite new package`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::scaffold;
use crate::core::workspace::Workspace;

/// Execute `granite new type <name>`
pub async fn execute_type(project_dir: &Path, name: &str) -> Result<()> {
    let mut workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;
    scaffold::new_type(&mut workspace, name)
        .with_context(|| format!("Failed to create type '{name}'"))?;

    output::success(&format!("Created new type '{name}'"));
    Ok(())
}

/// Execute `granite new package <type> <name>`
pub async fn execute_package(project_dir: &Path, package_type: &str, name: &str) -> Result<()> {
    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;
    let dir = scaffold::new_package(&workspace, package_type, name)
        .with_context(|| format!("Failed to create package '{name}'"))?;

    output::success(&format!(
        "Created {package_type} package '{name}' at {}",
        dir.display()
    ));
    Ok(())
}
