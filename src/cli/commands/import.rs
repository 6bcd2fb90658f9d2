//! Import command implementation
//!
//! Implements `granite import`: creates a package from a GitHub repository
//! or a local directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::import::{self, ImportSource};
use crate::core::workspace::Workspace;

/// Execute the import command
pub async fn execute(
    project_dir: &Path,
    source: &str,
    package_type: &str,
    name: &str,
) -> Result<()> {
    output::section("Importing Package");
    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;

    let parsed = ImportSource::parse(source);
    match &parsed {
        ImportSource::Git(url) => output::info(&format!("Cloning from GitHub: {url}")),
        ImportSource::Local(path) => {
            output::info(&format!("Importing from local path: {}", path.display()));
        }
    }

    let dir = import::import_package(&workspace, package_type, name, &parsed)
        .await
        .with_context(|| format!("Failed to import '{source}'"))?;

    output::success(&format!(
        "Successfully imported '{source}' as package '{name}' of type '{package_type}' at {}",
        dir.display()
    ));
    Ok(())
}
