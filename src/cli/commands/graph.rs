//! Graph command implementation
//!
//! Implements `granite graph`: renders the dependency graph as a terminal
//! tree or a Graphviz DOT document.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::output;
use crate::core::tree::GraphView;
use crate::core::workspace::Workspace;

/// Execute the graph command
pub async fn execute(
    project_dir: &Path,
    format: &str,
    output_file: Option<&Path>,
    show_types: bool,
) -> Result<()> {
    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;

    let view = GraphView::from_workspace(&workspace);
    if view.is_empty() {
        output::info("No packages found");
        return Ok(());
    }

    match format {
        "dot" => {
            let dot = view.format_dot(show_types);
            if let Some(path) = output_file {
                std::fs::write(path, dot)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                output::success(&format!("DOT graph written to {}", path.display()));
            } else {
                print!("{dot}");
            }
        }
        "tree" => {
            output::section("Package Dependencies");
            print!("{}", view.format_tree(show_types));

            let stats = view.statistics();
            output::section("Statistics");
            output::detail(&format!("Total packages: {}", stats.package_count));
            output::detail(&format!(
                "Total dependencies: {}",
                stats.total_dependencies
            ));
            output::detail(&format!(
                "Average dependencies per package: {:.1}",
                stats.average_dependencies()
            ));
            if !stats.heaviest_dependers.is_empty() {
                output::detail("Packages with most dependencies:");
                for (name, count) in &stats.heaviest_dependers {
                    output::detail(&format!("  • {name} ({count} dependencies)"));
                }
            }
        }
        other => bail!("Unknown output format: {other}"),
    }

    Ok(())
}
