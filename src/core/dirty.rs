//! Dirty tracking
//!
//! Decides which packages have changed since their last successful build and
//! propagates that status to every package that depends on them, directly or
//! transitively, via the reverse-dependency graph.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::cache::FingerprintStore;
use crate::core::workspace::Package;
use crate::core::{fingerprint, resolver};

/// Why a package is considered directly dirty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirtyReason {
    /// No fingerprint stored for this package
    NoCacheEntry,
    /// Stored fingerprint differs from the current one
    FilesChanged,
    /// The fingerprint could not be computed; assume dirty
    FingerprintFailed(String),
}

impl fmt::Display for DirtyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCacheEntry => write!(f, "No cache found"),
            Self::FilesChanged => write!(f, "Files changed"),
            Self::FingerprintFailed(error) => {
                write!(f, "Could not calculate fingerprint: {error}")
            }
        }
    }
}

/// Packages whose current fingerprint differs from their cache entry (or
/// that have none), in catalog order, with the reason for each.
pub fn directly_dirty(
    packages: &[Package],
    store: &dyn FingerprintStore,
) -> Vec<(String, DirtyReason)> {
    let mut dirty = Vec::new();

    for pkg in packages {
        let current = match fingerprint::compute(pkg.dir()) {
            Ok(fp) => fp,
            Err(e) => {
                dirty.push((pkg.name.clone(), DirtyReason::FingerprintFailed(e.to_string())));
                continue;
            }
        };

        match store.load(&pkg.name) {
            None => dirty.push((pkg.name.clone(), DirtyReason::NoCacheEntry)),
            Some(cached) if cached != current => {
                dirty.push((pkg.name.clone(), DirtyReason::FilesChanged));
            }
            Some(_) => {}
        }
    }

    dirty
}

/// Expand a set of dirty packages to everything that depends on them.
///
/// Walks the reverse-dependency edges transitively; the result set doubles
/// as the visited set, so cycles terminate.
pub fn propagate(
    seeds: impl IntoIterator<Item = String>,
    reverse_deps: &HashMap<String, Vec<String>>,
) -> HashSet<String> {
    let mut all_dirty: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = seeds.into_iter().collect();

    while let Some(name) = stack.pop() {
        if !all_dirty.insert(name.clone()) {
            continue;
        }
        if let Some(dependents) = reverse_deps.get(&name) {
            for dependent in dependents {
                if !all_dirty.contains(dependent) {
                    tracing::debug!("Package {dependent} is dirty because it depends on {name}");
                    stack.push(dependent.clone());
                }
            }
        }
    }

    all_dirty
}

/// Result of restricting a catalog to its dirty subset
#[derive(Debug)]
pub struct DirtyFilter {
    /// The dirty packages, in catalog order
    pub packages: Vec<Package>,
    /// How many were dirty through their own files
    pub directly_dirty: usize,
}

impl DirtyFilter {
    /// How many packages are dirty only through a dependency
    pub fn affected_by_dependencies(&self) -> usize {
        self.packages.len() - self.directly_dirty
    }
}

/// Restrict `packages` to those needing a rebuild: directly changed ones
/// plus every transitive dependent.
pub fn filter_dirty(packages: &[Package], store: &dyn FingerprintStore) -> DirtyFilter {
    let direct = directly_dirty(packages, store);
    let directly_dirty = direct.len();

    let reverse = resolver::reverse_dependencies(packages);
    let all_dirty = propagate(direct.into_iter().map(|(name, _)| name), &reverse);

    DirtyFilter {
        packages: packages
            .iter()
            .filter(|p| all_dirty.contains(&p.name))
            .cloned()
            .collect(),
        directly_dirty,
    }
}
