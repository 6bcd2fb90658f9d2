//! Default configuration values

use std::time::Duration;

/// File name of the workspace and package config files
pub const CONFIG_FILE_NAME: &str = "granite.toml";

/// Workspace-local state directory
pub const STATE_DIR: &str = ".granite";

/// Cache directory beneath the state directory
pub const CACHE_DIR: &str = "cache";

/// Extension of persisted fingerprint entries
pub const CACHE_ENTRY_EXT: &str = "hash";

/// Target executed when none is requested explicitly
pub const DEFAULT_TARGET: &str = "build";

/// Deadline for a single package build
pub const BUILD_TIMEOUT: Duration = Duration::from_secs(120);

/// Type created by `granite init` when no `lib` type exists yet
pub const DEFAULT_TYPE_NAME: &str = "lib";

/// Directory layout roots for scaffolded types
pub const PACKAGES_ROOT: &str = "packages";
pub const BUILD_ROOT: &str = "build";
pub const COVERAGE_ROOT: &str = "coverage";

/// Placeholder commands written into freshly scaffolded types
pub const PLACEHOLDER_BUILD: &str = "echo 'Implement build logic'";
pub const PLACEHOLDER_TEST: &str = "echo 'Implement test logic'";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
