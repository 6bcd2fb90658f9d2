//! Workspace and package scaffolding
//!
//! Business logic behind `granite init`, `granite new type` and
//! `granite new <type> <name>`.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::workspace::{
    PackageManifest, PackageSection, TypeConfig, Workspace, WorkspaceConfig,
};
use crate::error::ScaffoldError;

/// Result of initializing a workspace
#[derive(Debug)]
pub struct InitResult {
    /// Path of the written workspace config
    pub config_path: PathBuf,
    /// Whether the default type was added by this call
    pub default_type_added: bool,
}

/// The type registered when a workspace is initialized without one
fn default_type(name: &str) -> TypeConfig {
    TypeConfig {
        package_dir: format!("{}/{name}", defaults::PACKAGES_ROOT),
        build_dir: format!("{}/{name}", defaults::BUILD_ROOT),
        coverage_dir: format!("{}/{name}", defaults::COVERAGE_ROOT),
        targets: [
            ("build".to_string(), defaults::PLACEHOLDER_BUILD.to_string()),
            ("test".to_string(), defaults::PLACEHOLDER_TEST.to_string()),
        ]
        .into_iter()
        .collect(),
        can_depend_on: vec![name.to_string()],
    }
}

/// Initialize (or refresh) the workspace at `root`.
///
/// Creates the state directory, merges a default `lib` type into the config
/// when absent, and writes the config back. Existing types and repo
/// metadata are preserved, so re-running is safe.
pub fn init_workspace(root: &Path) -> Result<InitResult, ScaffoldError> {
    let state_dir = root.join(defaults::STATE_DIR);
    std::fs::create_dir_all(&state_dir).map_err(|e| ScaffoldError::IoError {
        path: state_dir,
        error: e.to_string(),
    })?;

    let config_path = root.join(defaults::CONFIG_FILE_NAME);
    let mut config = if config_path.exists() {
        let content =
            std::fs::read_to_string(&config_path).map_err(|e| ScaffoldError::IoError {
                path: config_path.clone(),
                error: e.to_string(),
            })?;
        WorkspaceConfig::from_toml(&content, &config_path).map_err(|e| {
            ScaffoldError::IoError {
                path: config_path.clone(),
                error: e.to_string(),
            }
        })?
    } else {
        WorkspaceConfig::default()
    };

    let default_type_added = !config.types.contains_key(defaults::DEFAULT_TYPE_NAME);
    if default_type_added {
        config.types.insert(
            defaults::DEFAULT_TYPE_NAME.to_string(),
            default_type(defaults::DEFAULT_TYPE_NAME),
        );
    }

    let content = config.to_toml().map_err(|e| ScaffoldError::IoError {
        path: config_path.clone(),
        error: e.to_string(),
    })?;
    std::fs::write(&config_path, content).map_err(|e| ScaffoldError::IoError {
        path: config_path.clone(),
        error: e.to_string(),
    })?;

    Ok(InitResult {
        config_path,
        default_type_added,
    })
}

/// Register a new package type and create its directories.
pub fn new_type(workspace: &mut Workspace, name: &str) -> Result<(), ScaffoldError> {
    if workspace.config.types.contains_key(name) {
        return Err(ScaffoldError::TypeExists {
            name: name.to_string(),
        });
    }

    let type_config = default_type(name);
    for dir in [
        &type_config.package_dir,
        &type_config.build_dir,
        &type_config.coverage_dir,
    ] {
        let path = workspace.root.join(dir);
        std::fs::create_dir_all(&path).map_err(|e| ScaffoldError::IoError {
            path,
            error: e.to_string(),
        })?;
    }

    workspace.config.types.insert(name.to_string(), type_config);
    workspace
        .save_config()
        .map_err(|e| ScaffoldError::IoError {
            path: workspace.root.join(defaults::CONFIG_FILE_NAME),
            error: e.to_string(),
        })
}

/// Scaffold a new package of the given type.
///
/// Creates `<package_dir>/<name>/granite.toml` with a minimal manifest.
pub fn new_package(
    workspace: &Workspace,
    type_name: &str,
    name: &str,
) -> Result<PathBuf, ScaffoldError> {
    let Some(type_config) = workspace.config.types.get(type_name) else {
        return Err(ScaffoldError::UnknownType {
            name: type_name.to_string(),
        });
    };

    let package_dir = workspace.root.join(&type_config.package_dir).join(name);
    if package_dir.exists() {
        return Err(ScaffoldError::PackageExists {
            name: name.to_string(),
            path: package_dir,
        });
    }

    std::fs::create_dir_all(&package_dir).map_err(|e| ScaffoldError::IoError {
        path: package_dir.clone(),
        error: e.to_string(),
    })?;

    let manifest = PackageManifest {
        package: PackageSection {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            dependencies: Vec::new(),
            hash: None,
        },
        targets: Default::default(),
    };
    let manifest_path = package_dir.join(defaults::CONFIG_FILE_NAME);
    let content = manifest.to_toml().map_err(|e| ScaffoldError::IoError {
        path: manifest_path.clone(),
        error: e.to_string(),
    })?;
    std::fs::write(&manifest_path, content).map_err(|e| ScaffoldError::IoError {
        path: manifest_path.clone(),
        error: e.to_string(),
    })?;

    Ok(package_dir)
}
