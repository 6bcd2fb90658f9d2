//! Build command implementation
//!
//! Implements `granite build`: loads the catalog, optionally restricts it to
//! dirty packages, resolves the build order, plans parallel stages, and
//! drives the run coordinator.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cli::output;
use crate::config::defaults;
use crate::core::cache::FsStore;
use crate::core::executor::Executor;
use crate::core::runner::{self, RunEvent};
use crate::core::workspace::Workspace;
use crate::core::{dirty, resolver, schedule};

/// Build options
pub struct BuildOptions {
    /// Bypass the build cache
    pub no_cache: bool,
    /// Only build packages with changes (and their dependents)
    pub dirty: bool,
    /// Target to execute
    pub target: String,
}

/// Execute the build command
pub async fn execute(project_dir: &Path, options: BuildOptions) -> Result<()> {
    output::section("Loading Packages");
    let workspace =
        Workspace::load(project_dir).with_context(|| "Failed to load workspace")?;
    output::success(&format!("Loaded {} packages", workspace.packages.len()));

    let store = Arc::new(FsStore::new(workspace.cache_dir()));
    let types = workspace.package_types();

    let mut packages = workspace.packages.clone();

    if options.dirty {
        output::info("Filtering packages with no changes");
        let filter = dirty::filter_dirty(&packages, store.as_ref());
        output::success(&format!(
            "Found {} packages with changes",
            filter.packages.len()
        ));
        if filter.affected_by_dependencies() > 0 {
            output::detail(&format!(
                "{} packages are directly changed, {} are affected by dependencies",
                filter.directly_dirty,
                filter.affected_by_dependencies()
            ));
        }
        packages = filter.packages;

        if packages.is_empty() {
            output::success("No packages to build");
            return Ok(());
        }
    }

    output::section("Resolving Dependencies");
    let resolution = resolver::resolve(&packages);
    for warning in &resolution.warnings {
        output::warning(warning);
    }
    output::success("Dependencies resolved successfully");

    output::section("Building Packages");
    let names: Vec<&str> = resolution.order.iter().map(|p| p.name.as_str()).collect();
    output::detail(&format!("Build order: {}", names.join(" → ")));

    let plan = schedule::plan(&resolution.order);
    for warning in &plan.warnings {
        output::warning(warning);
    }
    output::detail(&format!(
        "Build will execute in {} parallel stages",
        plan.stages.len()
    ));

    let total = plan.package_count();
    if total == 0 {
        output::info("No packages to build");
        return Ok(());
    }

    let executor = Arc::new(Executor::new(
        store,
        options.no_cache,
        options.target,
        defaults::BUILD_TIMEOUT,
    ));

    let progress = output::create_build_bar(total as u64);
    let stage_count = plan.stages.len();
    let report = runner::run(executor, plan.stages, &types, |event| match event {
        RunEvent::StageStarted { index, size, .. } => {
            progress.println(format!(
                "{} Stage {}/{stage_count}: Building {size} packages in parallel",
                output::status::INFO,
                index + 1
            ));
        }
        RunEvent::PackageFinished(result) => {
            progress.inc(1);
            let line = if !result.success {
                let detail = result
                    .error
                    .as_ref()
                    .map_or_else(|| "unknown error".to_string(), ToString::to_string);
                format!("  {} {} failed: {detail}", output::status::ERROR, result.name)
            } else if result.skipped {
                format!("  Using cached build for {}", result.name)
            } else {
                format!(
                    "  {} {} built in {:.2?}",
                    output::status::SUCCESS,
                    result.name,
                    result.duration
                )
            };
            progress.println(line);
        }
        RunEvent::StageCompleted {
            index,
            failures,
            duration,
        } => {
            let line = if failures > 0 {
                format!(
                    "{} Stage {} completed with {failures} failures ({duration:.2?})",
                    output::status::WARNING,
                    index + 1
                )
            } else {
                format!(
                    "{} Stage {} completed successfully ({duration:.2?})",
                    output::status::SUCCESS,
                    index + 1
                )
            };
            progress.println(line);
        }
    })
    .await;
    progress.finish_and_clear();

    output::render_report(&report);

    if !report.is_success() {
        bail!("{} package(s) failed to build", report.failed());
    }
    Ok(())
}
