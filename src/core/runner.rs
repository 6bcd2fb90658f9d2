//! Run coordination
//!
//! Drives the staged plan: stages run strictly one after another, packages
//! inside a stage fan out as independent concurrent tasks joined through a
//! `JoinSet` barrier. The first stage containing a failure stops the run;
//! packages in later stages are reported as not attempted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::core::executor::{BuildResult, Executor};
use crate::core::workspace::{Package, TypeConfig};

/// Package name → resolved type, as produced by
/// [`crate::core::workspace::Workspace::package_types`]
pub type PackageTypes = HashMap<String, Option<(String, TypeConfig)>>;

/// Progress notifications emitted while the run advances.
///
/// Rendering is the caller's concern; the coordinator only reports.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// A stage is about to launch its packages
    StageStarted {
        /// Zero-based stage index
        index: usize,
        /// Total number of stages
        total: usize,
        /// Packages in this stage
        size: usize,
    },
    /// One package finished (built, skipped, or failed)
    PackageFinished(&'a BuildResult),
    /// A stage fully joined
    StageCompleted {
        /// Zero-based stage index
        index: usize,
        /// Number of failed packages in the stage
        failures: usize,
        /// Wall time of the stage
        duration: Duration,
    },
}

/// Aggregate outcome of a full run
#[derive(Debug)]
pub struct BuildReport {
    /// Every attempted package's result, in completion order
    pub results: Vec<BuildResult>,
    /// Packages never attempted because an earlier stage failed
    pub not_attempted: Vec<String>,
    /// Wall time of the whole run
    pub total_duration: Duration,
}

impl BuildReport {
    /// Number of packages that built successfully (cache hits included)
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of packages that failed
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Number of packages skipped on a cache hit
    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.skipped).count()
    }

    /// Names of the failed packages, in completion order
    pub fn failed_names(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// True when every attempted package succeeded
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Execute the staged plan against an executor.
///
/// Within a stage every package runs as its own task; a failing task never
/// cancels its stage siblings, and the stage joins completely before the
/// failure check decides whether the next stage launches.
pub async fn run(
    executor: Arc<Executor>,
    stages: Vec<Vec<Package>>,
    types: &PackageTypes,
    mut observer: impl FnMut(RunEvent<'_>),
) -> BuildReport {
    let start = Instant::now();
    let total_stages = stages.len();

    let mut results: Vec<BuildResult> = Vec::new();
    let mut not_attempted: Vec<String> = Vec::new();
    let mut halted = false;

    for (index, stage) in stages.into_iter().enumerate() {
        if halted {
            not_attempted.extend(stage.into_iter().map(|p| p.name));
            continue;
        }

        observer(RunEvent::StageStarted {
            index,
            total: total_stages,
            size: stage.len(),
        });
        let stage_start = Instant::now();

        let mut join_set: JoinSet<BuildResult> = JoinSet::new();
        for package in stage {
            let executor = Arc::clone(&executor);
            let package_type = types.get(&package.name).cloned().flatten();
            join_set.spawn(async move {
                executor.execute(&package, package_type.as_ref()).await
            });
        }

        let mut failures = 0;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    if !result.success {
                        failures += 1;
                    }
                    observer(RunEvent::PackageFinished(&result));
                    results.push(result);
                }
                Err(e) => {
                    // A panicked build task counts against the stage even
                    // though no per-package result can be attributed.
                    tracing::error!("Build task failed to join: {e}");
                    failures += 1;
                }
            }
        }

        observer(RunEvent::StageCompleted {
            index,
            failures,
            duration: stage_start.elapsed(),
        });

        if failures > 0 {
            halted = true;
        }
    }

    BuildReport {
        results,
        not_attempted,
        total_duration: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use crate::core::cache::MemoryStore;
    use crate::test_utils::materialize_package;
    use tempfile::TempDir;

    fn executor(bypass_cache: bool) -> Arc<Executor> {
        Arc::new(Executor::new(
            Arc::new(MemoryStore::new()),
            bypass_cache,
            defaults::DEFAULT_TARGET.to_string(),
            defaults::BUILD_TIMEOUT,
        ))
    }

    fn with_command(mut pkg: Package, command: &str) -> Package {
        pkg.targets
            .insert("build".to_string(), command.to_string());
        pkg
    }

    #[tokio::test]
    async fn test_all_stages_run_when_everything_succeeds() {
        let tmp = TempDir::new().unwrap();
        let stages = vec![
            vec![with_command(
                materialize_package(tmp.path(), "util", &[]),
                "true",
            )],
            vec![with_command(
                materialize_package(tmp.path(), "app", &["util"]),
                "true",
            )],
        ];

        let report = run(executor(true), stages, &PackageTypes::new(), |_| {}).await;

        assert!(report.is_success());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 0);
        assert!(report.not_attempted.is_empty());
    }

    #[tokio::test]
    async fn test_stage_failure_halts_later_stages() {
        let tmp = TempDir::new().unwrap();
        // Stage 1: A fails, B succeeds. Stage 2: C never runs.
        let stages = vec![
            vec![
                with_command(materialize_package(tmp.path(), "a", &[]), "exit 1"),
                with_command(materialize_package(tmp.path(), "b", &[]), "true"),
            ],
            vec![with_command(
                materialize_package(tmp.path(), "c", &["a"]),
                "true",
            )],
        ];

        let report = run(executor(true), stages, &PackageTypes::new(), |_| {}).await;

        assert!(!report.is_success());
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_names(), vec!["a"]);
        assert_eq!(report.not_attempted, vec!["c"]);

        // B's result exists even though its sibling failed.
        assert!(report
            .results
            .iter()
            .any(|r| r.name == "b" && r.success));
    }

    #[tokio::test]
    async fn test_siblings_complete_even_when_one_fails_fast() {
        let tmp = TempDir::new().unwrap();
        // The failure lands immediately; the sibling takes visibly longer.
        // The stage must still join both.
        let stages = vec![vec![
            with_command(materialize_package(tmp.path(), "fast-fail", &[]), "false"),
            with_command(
                materialize_package(tmp.path(), "slow-ok", &[]),
                "sleep 0.3",
            ),
        ]];

        let report = run(executor(true), stages, &PackageTypes::new(), |_| {}).await;

        assert_eq!(report.results.len(), 2);
        assert!(report
            .results
            .iter()
            .any(|r| r.name == "slow-ok" && r.success));
    }

    #[tokio::test]
    async fn test_observer_sees_stage_and_package_events() {
        let tmp = TempDir::new().unwrap();
        let stages = vec![vec![with_command(
            materialize_package(tmp.path(), "solo", &[]),
            "true",
        )]];

        let mut events = Vec::new();
        let report = run(executor(true), stages, &PackageTypes::new(), |event| {
            events.push(match event {
                RunEvent::StageStarted { size, .. } => format!("start:{size}"),
                RunEvent::PackageFinished(r) => format!("done:{}", r.name),
                RunEvent::StageCompleted { failures, .. } => format!("end:{failures}"),
            });
        })
        .await;

        assert!(report.is_success());
        assert_eq!(events, vec!["start:1", "done:solo", "end:0"]);
    }

    #[tokio::test]
    async fn test_multiple_failed_names_are_collected() {
        let tmp = TempDir::new().unwrap();
        let stages = vec![vec![
            with_command(materialize_package(tmp.path(), "x", &[]), "exit 1"),
            with_command(materialize_package(tmp.path(), "y", &[]), "exit 2"),
        ]];

        let report = run(executor(true), stages, &PackageTypes::new(), |_| {}).await;

        assert_eq!(report.failed(), 2);
        let mut names = report.failed_names();
        names.sort_unstable();
        assert_eq!(names, vec!["x", "y"]);
    }
}
