//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory for test workspaces and provides
/// utilities for setting up packages and running the granite binary.
pub struct TestWorkspace {
    /// Temporary directory backing the workspace
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a new empty test workspace
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the workspace
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write a root config with a `lib` type whose build target is `cmd`
    /// (omitted entirely when `cmd` is empty) and a command-less `tool`
    /// type.
    pub fn write_root_config(&self, cmd: &str) {
        let targets = if cmd.is_empty() {
            String::new()
        } else {
            format!("[types.lib.targets]\nbuild = \"{cmd}\"\n")
        };
        self.create_file(
            "granite.toml",
            &format!(
                r#"[repo]
name = "test-workspace"

[types.lib]
package_dir = "packages/lib"
build_dir = "build/lib"
coverage_dir = "coverage/lib"

{targets}
[types.tool]
package_dir = "packages/tool"
build_dir = "build/tool"
coverage_dir = "coverage/tool"
"#
            ),
        );
    }

    /// Create a `lib` package with dependencies and an optional
    /// package-level build command override.
    pub fn add_package(&self, name: &str, dependencies: &[&str], build_override: Option<&str>) {
        self.add_typed_package("lib", name, dependencies, build_override);
    }

    /// Create a package under the given type directory.
    pub fn add_typed_package(
        &self,
        package_type: &str,
        name: &str,
        dependencies: &[&str],
        build_override: Option<&str>,
    ) {
        let deps = dependencies
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let targets = build_override
            .map(|cmd| format!("\n[targets]\nbuild = \"{cmd}\"\n"))
            .unwrap_or_default();
        self.create_file(
            &format!("packages/{package_type}/{name}/granite.toml"),
            &format!(
                "[package]\nname = \"{name}\"\nversion = \"0.1.0\"\ndependencies = [{deps}]\n{targets}"
            ),
        );
        self.create_file(
            &format!("packages/{package_type}/{name}/source.txt"),
            &format!("source of {name}\n"),
        );
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the granite binary with arguments in the workspace directory
pub fn run_granite(workspace: &TestWorkspace, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_granite"));
    cmd.current_dir(workspace.path());
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute granite")
}

/// Combined stdout and stderr of a finished command
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
