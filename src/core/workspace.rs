//! Workspace configuration and package catalog
//!
//! A granite workspace is a directory tree containing one `granite.toml` at
//! the root (repo metadata, package types, shared targets) and one
//! `granite.toml` per package (name, version, dependencies, target
//! overrides). The catalog walks the tree and parses every config file it
//! finds into in-memory records.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::defaults;
use crate::error::WorkspaceError;

/// The workspace root config (granite.toml at the repository root)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Repository metadata
    #[serde(default)]
    pub repo: RepoConfig,

    /// Workspace-wide target commands
    #[serde(default)]
    pub targets: BTreeMap<String, String>,

    /// Registered package types
    #[serde(default)]
    pub types: BTreeMap<String, TypeConfig>,
}

/// Repository metadata section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoConfig {
    /// Repository name
    #[serde(default)]
    pub name: String,

    /// Repository URL
    #[serde(default)]
    pub url: String,

    /// Repository owner
    #[serde(default)]
    pub owner: String,

    /// License identifier
    #[serde(default)]
    pub license: String,
}

/// Configuration for a package type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypeConfig {
    /// Directory holding packages of this type
    #[serde(default)]
    pub package_dir: String,

    /// Directory receiving build artifacts
    #[serde(default)]
    pub build_dir: String,

    /// Directory receiving coverage reports
    #[serde(default)]
    pub coverage_dir: String,

    /// Default target commands for this type
    #[serde(default)]
    pub targets: BTreeMap<String, String>,

    /// Type names packages of this type may depend on.
    /// Declared for documentation and analysis; not enforced by the build
    /// pipeline.
    #[serde(default)]
    pub can_depend_on: Vec<String>,
}

/// A package config file (granite.toml inside a package directory)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// The package section
    #[serde(default)]
    pub package: PackageSection,

    /// Target command overrides for this package
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

/// The `[package]` section of a package config
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageSection {
    /// Package name. Empty for the workspace-root record.
    #[serde(default)]
    pub name: String,

    /// Free-form version string
    #[serde(default)]
    pub version: String,

    /// Names of packages this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Last stored fingerprint, informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// An in-memory package record, immutable for the duration of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Unique, non-empty package name
    pub name: String,
    /// Free-form version string
    pub version: String,
    /// Declared dependency names, in declaration order. May repeat and may
    /// reference names absent from the catalog.
    pub dependencies: Vec<String>,
    /// Path of the package's granite.toml
    pub config_path: PathBuf,
    /// Stored fingerprint carried in the manifest, if any
    pub hash: Option<String>,
    /// Target command overrides from the package config
    pub targets: BTreeMap<String, String>,
}

impl Package {
    /// The package's on-disk directory, derived from its config path
    pub fn dir(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("."))
    }
}

impl PackageManifest {
    /// Parse a package manifest from TOML
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, WorkspaceError> {
        toml::from_str(content).map_err(|e| WorkspaceError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String, WorkspaceError> {
        toml::to_string_pretty(self).map_err(|e| WorkspaceError::SerializeError {
            error: e.to_string(),
        })
    }
}

impl WorkspaceConfig {
    /// Parse a workspace config from TOML
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, WorkspaceError> {
        toml::from_str(content).map_err(|e| WorkspaceError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String, WorkspaceError> {
        toml::to_string_pretty(self).map_err(|e| WorkspaceError::SerializeError {
            error: e.to_string(),
        })
    }
}

/// A loaded workspace: root directory, root config, and package catalog
#[derive(Debug)]
pub struct Workspace {
    /// Workspace root directory
    pub root: PathBuf,
    /// Parsed root config
    pub config: WorkspaceConfig,
    /// All packages discovered beneath the root, root records excluded
    pub packages: Vec<Package>,
}

impl Workspace {
    /// Load the workspace rooted at `root`.
    ///
    /// Reads the root granite.toml (an empty config if absent, mirroring a
    /// freshly initialized workspace) and walks the tree for package
    /// configs. Records with an empty package name are workspace-root
    /// records and are excluded from the catalog.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let config_path = root.join(defaults::CONFIG_FILE_NAME);
        let config = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| WorkspaceError::IoError {
                    path: config_path.clone(),
                    error: e.to_string(),
                })?;
            WorkspaceConfig::from_toml(&content, &config_path)?
        } else {
            WorkspaceConfig::default()
        };

        let packages = discover_packages(root)?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
            packages,
        })
    }

    /// Persist the root config back to granite.toml
    pub fn save_config(&self) -> Result<(), WorkspaceError> {
        let config_path = self.root.join(defaults::CONFIG_FILE_NAME);
        let content = self.config.to_toml()?;
        std::fs::write(&config_path, content).map_err(|e| WorkspaceError::IoError {
            path: config_path,
            error: e.to_string(),
        })
    }

    /// Workspace-local state directory (`.granite`)
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(defaults::STATE_DIR)
    }

    /// Fingerprint cache directory (`.granite/cache`)
    pub fn cache_dir(&self) -> PathBuf {
        self.state_dir().join(defaults::CACHE_DIR)
    }

    /// Look up a package by name
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Determine a package's type by directory containment: the package
    /// belongs to the first type whose `package_dir` appears in its
    /// directory path.
    pub fn package_type(&self, package: &Package) -> Option<(&str, &TypeConfig)> {
        let dir = package.dir().to_string_lossy().into_owned();
        self.config
            .types
            .iter()
            .find(|(_, type_config)| {
                !type_config.package_dir.is_empty() && dir.contains(&type_config.package_dir)
            })
            .map(|(name, type_config)| (name.as_str(), type_config))
    }

    /// Resolve every package's type up front, keyed by package name, for
    /// handing owned data to concurrent build tasks.
    pub fn package_types(&self) -> HashMap<String, Option<(String, TypeConfig)>> {
        self.packages
            .iter()
            .map(|pkg| {
                (
                    pkg.name.clone(),
                    self.package_type(pkg)
                        .map(|(name, config)| (name.to_string(), config.clone())),
                )
            })
            .collect()
    }
}

/// Walk `root` and parse every granite.toml into a package record.
///
/// The root config (empty package name) is skipped. Hidden directories are
/// pruned so state and VCS internals are never scanned.
fn discover_packages(root: &Path) -> Result<Vec<Package>, WorkspaceError> {
    let mut packages = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        !hidden || entry.path() == root
    });

    for entry in walker {
        let entry = entry.map_err(|e| WorkspaceError::IoError {
            path: root.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() || entry.file_name() != defaults::CONFIG_FILE_NAME {
            continue;
        }

        let path = entry.path();
        let content = std::fs::read_to_string(path).map_err(|e| WorkspaceError::IoError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let manifest = PackageManifest::from_toml(&content, path)?;

        if manifest.package.name.is_empty() {
            tracing::debug!("Skipping root config record at {}", path.display());
            continue;
        }

        packages.push(Package {
            name: manifest.package.name,
            version: manifest.package.version,
            dependencies: manifest.package.dependencies,
            config_path: path.to_path_buf(),
            hash: manifest.package.hash,
            targets: manifest.targets,
        });
    }

    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_workspace_config() {
        let content = r#"
[repo]
name = "monorepo"
owner = "acme"

[types.lib]
package_dir = "packages/lib"
build_dir = "build/lib"
coverage_dir = "coverage/lib"
can_depend_on = ["lib"]

[types.lib.targets]
build = "make build"
test = "make test"
"#;
        let config = WorkspaceConfig::from_toml(content, Path::new("granite.toml")).unwrap();
        assert_eq!(config.repo.name, "monorepo");
        let lib = &config.types["lib"];
        assert_eq!(lib.package_dir, "packages/lib");
        assert_eq!(lib.targets["build"], "make build");
        assert_eq!(lib.can_depend_on, vec!["lib"]);
    }

    #[test]
    fn test_parse_package_manifest() {
        let content = r#"
[package]
name = "core"
version = "1.2.0"
dependencies = ["util", "util"]

[targets]
build = "cargo build"
"#;
        let manifest =
            PackageManifest::from_toml(content, Path::new("granite.toml")).unwrap();
        assert_eq!(manifest.package.name, "core");
        assert_eq!(manifest.package.version, "1.2.0");
        // Declaration order and duplicates are preserved
        assert_eq!(manifest.package.dependencies, vec!["util", "util"]);
        assert_eq!(manifest.targets["build"], "cargo build");
    }

    #[test]
    fn test_discover_skips_root_record_and_hidden_dirs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        write(root, "granite.toml", "[repo]\nname = \"ws\"\n");
        write(
            root,
            "packages/lib/util/granite.toml",
            "[package]\nname = \"util\"\nversion = \"0.1.0\"\n",
        );
        write(
            root,
            ".granite/cache/granite.toml",
            "[package]\nname = \"ghost\"\n",
        );

        let workspace = Workspace::load(root).unwrap();
        let names: Vec<_> = workspace.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["util"]);
    }

    #[test]
    fn test_package_type_by_directory_containment() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        write(
            root,
            "granite.toml",
            r#"
[types.lib]
package_dir = "packages/lib"

[types.app]
package_dir = "packages/app"
"#,
        );
        write(
            root,
            "packages/app/web/granite.toml",
            "[package]\nname = \"web\"\n",
        );

        let workspace = Workspace::load(root).unwrap();
        let web = workspace.package("web").unwrap();
        let (type_name, _) = workspace.package_type(web).unwrap();
        assert_eq!(type_name, "app");
    }

    #[test]
    fn test_missing_root_config_yields_empty_defaults() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::load(tmp.path()).unwrap();
        assert!(workspace.config.types.is_empty());
        assert!(workspace.packages.is_empty());
    }

    #[test]
    fn test_package_dir_from_config_path() {
        let pkg = Package {
            name: "x".to_string(),
            version: String::new(),
            dependencies: vec![],
            config_path: PathBuf::from("/ws/packages/lib/x/granite.toml"),
            hash: None,
            targets: BTreeMap::new(),
        };
        assert_eq!(pkg.dir(), Path::new("/ws/packages/lib/x"));
    }
}
