//! Test utilities: package fixtures and proptest generators

use std::path::{Path, PathBuf};

use crate::core::workspace::Package;

/// Build an in-memory package record with the given dependencies.
pub fn package_with_deps(name: String, dependencies: Vec<String>) -> Package {
    Package {
        config_path: PathBuf::from(format!("packages/{name}/granite.toml")),
        name,
        version: "1.0.0".to_string(),
        dependencies,
        hash: None,
        targets: std::collections::BTreeMap::new(),
    }
}

/// Shorthand for [`package_with_deps`] with borrowed names.
pub fn make_package(name: &str, dependencies: &[&str]) -> Package {
    package_with_deps(
        name.to_string(),
        dependencies.iter().map(ToString::to_string).collect(),
    )
}

/// Create a package with a real directory (one source file inside) under
/// `root/packages/<name>`, for tests that fingerprint or build.
pub fn materialize_package(root: &Path, name: &str, dependencies: &[&str]) -> Package {
    let dir = root.join("packages").join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create package directory");
    std::fs::write(dir.join("source.txt"), format!("contents of {name}\n"))
        .expect("Failed to write package source");

    let mut pkg = make_package(name, dependencies);
    pkg.config_path = dir.join("granite.toml");
    pkg
}

pub mod generators {
    use super::package_with_deps;
    use crate::core::workspace::Package;
    use proptest::prelude::*;

    /// Generate a valid package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,30}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate a catalog whose packages only depend on earlier packages,
    /// guaranteeing an acyclic graph.
    pub fn acyclic_catalog() -> impl Strategy<Value = Vec<Package>> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 1..8).prop_map(|rows| {
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    let deps = (0..i)
                        .filter(|j| row[*j])
                        .map(|j| format!("pkg{j}"))
                        .collect();
                    package_with_deps(format!("pkg{i}"), deps)
                })
                .collect()
        })
    }

    /// Generate a catalog with unrestricted dependency edges: cycles and
    /// self-dependencies included.
    pub fn arbitrary_catalog() -> impl Strategy<Value = Vec<Package>> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), 8), 1..8).prop_map(|rows| {
            let count = rows.len();
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    let deps = (0..count)
                        .filter(|j| row[*j])
                        .map(|j| format!("pkg{j}"))
                        .collect();
                    package_with_deps(format!("pkg{i}"), deps)
                })
                .collect()
        })
    }
}
