//! Package import
//!
//! Creates a package by pulling code from a git remote or a local
//! directory into the type's package directory, then writing the package
//! manifest for it.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::workspace::{PackageManifest, PackageSection, Workspace};
use crate::error::{GraniteError, ScaffoldError};
use crate::infra::{filesystem, git};

/// Where imported code comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A git remote, shallow-cloned
    Git(String),
    /// A directory on this machine, copied
    Local(PathBuf),
}

impl ImportSource {
    /// Classify a source argument: GitHub remotes are cloned, anything else
    /// is treated as a local path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("https://github.com/") || source.starts_with("git@github.com:") {
            Self::Git(source.to_string())
        } else {
            Self::Local(PathBuf::from(source))
        }
    }
}

/// Import `source` as a new package of `type_name` called `name`.
///
/// Returns the created package directory. The source's `.git` directory is
/// never carried into the workspace.
pub async fn import_package(
    workspace: &Workspace,
    type_name: &str,
    name: &str,
    source: &ImportSource,
) -> Result<PathBuf, GraniteError> {
    let Some(type_config) = workspace.config.types.get(type_name) else {
        return Err(ScaffoldError::UnknownType {
            name: type_name.to_string(),
        }
        .into());
    };

    let package_dir = workspace.root.join(&type_config.package_dir).join(name);
    if package_dir.exists() {
        return Err(ScaffoldError::PackageExists {
            name: name.to_string(),
            path: package_dir,
        }
        .into());
    }

    match source {
        ImportSource::Git(url) => {
            tracing::info!("Cloning {url}");
            // Clone straight into place, then drop the history.
            git::clone_shallow(url, &package_dir).await?;
            filesystem::remove_dir_all(&package_dir.join(".git"))?;
        }
        ImportSource::Local(path) => {
            if !path.exists() {
                return Err(GraniteError::Generic(format!(
                    "Source path '{}' does not exist",
                    path.display()
                )));
            }
            tracing::info!("Copying {}", path.display());
            filesystem::copy_dir(path, &package_dir)?;
        }
    }

    write_manifest(&package_dir, name)?;
    Ok(package_dir)
}

fn write_manifest(package_dir: &Path, name: &str) -> Result<(), GraniteError> {
    let manifest = PackageManifest {
        package: PackageSection {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            dependencies: Vec::new(),
            hash: None,
        },
        targets: Default::default(),
    };
    let path = package_dir.join(defaults::CONFIG_FILE_NAME);
    filesystem::write_file(&path, &manifest.to_toml()?)?;
    Ok(())
}
