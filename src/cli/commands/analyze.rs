//! Analyze command implementation
//!
//! Implements `granite analyze`: renders the workspace health report as
//! formatted text or JSON.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output;
use crate::core::analyze::{self, WorkspaceAnalysis};
use crate::core::workspace::Workspace;

/// Execute the analyze command
pub async fn execute(project_dir: &Path, json: bool) -> Result<()> {
    if !json {
        output::section("Loading Packages");
    }

    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;

    if !json {
        output::success(&format!("Loaded {} packages", workspace.packages.len()));
    }

    let analysis = analyze::analyze(&workspace);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&analysis)
                .with_context(|| "Failed to serialize analysis")?
        );
    } else {
        display_analysis(&analysis);
    }
    Ok(())
}

fn display_analysis(analysis: &WorkspaceAnalysis) {
    output::section("Workspace Overview");
    output::detail(&format!("Total packages: {}", analysis.total_packages));
    output::detail(&format!(
        "Total dependencies: {}",
        analysis.total_dependencies
    ));
    if analysis.total_packages > 0 {
        output::detail(&format!(
            "Average dependencies per package: {:.1}",
            analysis.average_dependencies()
        ));
    }

    if !analysis.packages_by_type.is_empty() {
        println!();
        output::info("Package Distribution by Type:");
        for (package_type, count) in &analysis.packages_by_type {
            output::detail(&format!("• {package_type}: {count} packages"));
        }
    }

    if !analysis.circular_dependencies.is_empty() {
        output::section("Circular Dependencies");
        for cycle in &analysis.circular_dependencies {
            output::warning(&cycle.join(" -> "));
        }
    }

    if !analysis.orphan_packages.is_empty() {
        output::section("Orphaned Packages");
        for name in &analysis.orphan_packages {
            output::detail(name);
        }
    }

    if !analysis.critical_path.is_empty() {
        output::section("Critical Path");
        output::detail(&analysis.critical_path.join(" → "));
    }

    let flagged: Vec<_> = analysis
        .packages
        .values()
        .filter(|p| !p.issues.is_empty())
        .collect();
    if !flagged.is_empty() {
        output::section("Package Issues");
        for pkg in flagged {
            output::info(&pkg.name);
            for issue in &pkg.issues {
                output::detail(&format!("{} {issue}", output::status::WARNING));
            }
            for suggestion in &pkg.suggestions {
                output::detail(&format!("  → {suggestion}"));
            }
        }
    }

    if !analysis.workspace_issues.is_empty() || !analysis.workspace_suggestions.is_empty() {
        output::section("Workspace Health");
        for issue in &analysis.workspace_issues {
            output::warning(issue);
        }
        for suggestion in &analysis.workspace_suggestions {
            output::detail(&format!("→ {suggestion}"));
        }
    }
}
