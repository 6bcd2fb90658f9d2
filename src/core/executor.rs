//! Build execution
//!
//! Runs a single package's build: resolves the effective command, checks the
//! fingerprint cache, executes the command under a deadline in the package
//! directory, and persists the fingerprint on success.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::cache::FingerprintStore;
use crate::core::fingerprint;
use crate::core::workspace::{Package, TypeConfig};
use crate::error::BuildError;

/// Outcome of one package's build attempt
#[derive(Debug)]
pub struct BuildResult {
    /// Package name
    pub name: String,
    /// Whether the build (or cache hit) succeeded
    pub success: bool,
    /// True when the build was skipped on a fingerprint match
    pub skipped: bool,
    /// Wall time spent on this package
    pub duration: Duration,
    /// The failure, when `success` is false
    pub error: Option<BuildError>,
}

impl BuildResult {
    fn succeeded(name: &str, skipped: bool, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            skipped,
            duration,
            error: None,
        }
    }

    fn failed(name: &str, duration: Duration, error: BuildError) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            skipped: false,
            duration,
            error: Some(error),
        }
    }
}

/// Executes package builds against a fingerprint store
pub struct Executor {
    store: Arc<dyn FingerprintStore>,
    /// Skip all cache reads and writes
    pub bypass_cache: bool,
    /// Target to execute (usually "build")
    pub target: String,
    /// Per-package deadline
    pub timeout: Duration,
}

impl Executor {
    /// Create an executor over a fingerprint store
    pub fn new(
        store: Arc<dyn FingerprintStore>,
        bypass_cache: bool,
        target: String,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            bypass_cache,
            target,
            timeout,
        }
    }

    /// Resolve the effective command for a package: the package's own target
    /// entry wins, the type default is the fallback. Empty commands count as
    /// undefined.
    pub fn resolve_command(
        &self,
        package: &Package,
        package_type: Option<&(String, TypeConfig)>,
    ) -> Result<String, BuildError> {
        if let Some(cmd) = package.targets.get(&self.target).filter(|c| !c.is_empty()) {
            return Ok(cmd.clone());
        }

        let Some((type_name, type_config)) = package_type else {
            return Err(BuildError::UnknownType {
                package: package.name.clone(),
            });
        };

        type_config
            .targets
            .get(&self.target)
            .filter(|c| !c.is_empty())
            .cloned()
            .ok_or_else(|| BuildError::NoBuildCommand {
                package: package.name.clone(),
                package_type: type_name.clone(),
                target: self.target.clone(),
            })
    }

    /// Build one package.
    ///
    /// The fingerprint is computed before the build; a matching cache entry
    /// short-circuits into a skipped success. On build success the same
    /// pre-build fingerprint is persisted. Cache read problems degrade to a
    /// plain rebuild and cache write problems are logged, never fatal.
    pub async fn execute(
        &self,
        package: &Package,
        package_type: Option<&(String, TypeConfig)>,
    ) -> BuildResult {
        let start = Instant::now();

        let current_fingerprint = match fingerprint::compute(package.dir()) {
            Ok(fp) => Some(fp),
            Err(e) => {
                tracing::warn!("Could not calculate fingerprint for {}: {e}", package.name);
                None
            }
        };

        if !self.bypass_cache {
            if let Some(fp) = &current_fingerprint {
                match self.store.load(&package.name) {
                    Some(cached) if &cached == fp => {
                        tracing::debug!("Using cached build for {}", package.name);
                        return BuildResult::succeeded(&package.name, true, start.elapsed());
                    }
                    Some(_) => {
                        tracing::debug!("Cache invalidated for {} (files changed)", package.name);
                    }
                    None => {}
                }
            }
        }

        let command = match self.resolve_command(package, package_type) {
            Ok(cmd) => cmd,
            Err(e) => return BuildResult::failed(&package.name, start.elapsed(), e),
        };

        tracing::debug!("Executing build command for {}: {command}", package.name);

        if let Err(e) = self.run_command(package, &command).await {
            return BuildResult::failed(&package.name, start.elapsed(), e);
        }

        if !self.bypass_cache {
            if let Some(fp) = &current_fingerprint {
                if let Err(e) = self.store.store(&package.name, fp) {
                    tracing::warn!("Failed to persist fingerprint for {}: {e}", package.name);
                }
            }
        }

        BuildResult::succeeded(&package.name, false, start.elapsed())
    }

    async fn run_command(&self, package: &Package, command: &str) -> Result<(), BuildError> {
        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(package.dir())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BuildError::SpawnFailed {
                package: package.name.clone(),
                error: e.to_string(),
            })?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(BuildError::CommandFailed {
                package: package.name.clone(),
                detail: match status.code() {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                },
            }),
            Ok(Err(e)) => Err(BuildError::CommandFailed {
                package: package.name.clone(),
                detail: e.to_string(),
            }),
            Err(_) => {
                // Deadline passed: reap the subprocess before reporting.
                let _ = child.kill().await;
                Err(BuildError::Timeout {
                    package: package.name.clone(),
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}
