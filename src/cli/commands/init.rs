//! Init command implementation
//!
//! Implements `granite init` to create or refresh a workspace.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::scaffold;

/// Execute the init command
pub async fn execute(project_dir: &Path) -> Result<()> {
    let result = scaffold::init_workspace(project_dir)
        .with_context(|| "Failed to initialize workspace")?;

    if result.default_type_added {
        output::detail("Registered default package type 'lib'");
    }
    output::success(&format!(
        "Initialized granite workspace in {}",
        project_dir.display()
    ));
    Ok(())
}
