//! Dependency resolution
//!
//! Builds a directed graph over the package catalog and computes a
//! dependency-first build order. Cycles are tolerated, never fatal: when the
//! topological sort gets stuck, the remaining packages are appended in
//! catalog order with a warning, trading ordering guarantees for liveness.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::workspace::Package;

/// Result of dependency resolution: the build order plus any warnings
/// raised while constructing it (missing dependencies, detected cycles).
#[derive(Debug)]
pub struct Resolution {
    /// Packages in dependency-first order
    pub order: Vec<Package>,
    /// Human-readable resolution warnings, for the caller to render
    pub warnings: Vec<String>,
}

/// Resolve the build order for a set of packages.
///
/// Edges run from each package to its catalog-resolvable dependencies; a
/// dependency name absent from the set contributes no edge and yields a
/// warning, leaving the dependent schedulable. Kahn's algorithm produces a
/// dependency-last sequence which is reversed into the returned
/// dependency-first order.
pub fn resolve(packages: &[Package]) -> Resolution {
    let mut warnings = Vec::new();

    // Catalog order drives every tie-break so the output is stable.
    let mut node_map: HashMap<&str, &Package> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    for pkg in packages {
        if node_map.insert(pkg.name.as_str(), pkg).is_none() {
            names.push(pkg.name.as_str());
        }
    }

    let mut edges: HashMap<&str, Vec<&str>> = names.iter().map(|n| (*n, Vec::new())).collect();
    let mut incoming: HashMap<&str, usize> = names.iter().map(|n| (*n, 0)).collect();

    for name in &names {
        for dep in &node_map[name].dependencies {
            let Some(dep) = node_map.get_key_value(dep.as_str()).map(|(k, _)| *k) else {
                warnings.push(format!(
                    "Package {name} depends on {dep}, but it doesn't exist"
                ));
                continue;
            };
            edges.get_mut(name).expect("node registered").push(dep);
            *incoming.get_mut(dep).expect("node registered") += 1;
        }
    }

    let mut queue: VecDeque<&str> = names
        .iter()
        .copied()
        .filter(|n| incoming[n] == 0)
        .collect();

    let mut order: Vec<&str> = Vec::with_capacity(names.len());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &dep in &edges[node] {
            let count = incoming.get_mut(dep).expect("node registered");
            *count -= 1;
            if *count == 0 {
                queue.push_back(dep);
            }
        }
    }

    // Anything still unplaced sits on a cycle: append in catalog order
    // rather than failing the run.
    if order.len() != names.len() {
        warnings.push(
            "Possible dependency cycle detected. Building packages in best-effort order."
                .to_string(),
        );
        let placed: HashSet<&str> = order.iter().copied().collect();
        for &name in &names {
            if !placed.contains(name) {
                order.push(name);
            }
        }
    }

    // Kahn emitted consumers first; reverse for dependencies-first.
    order.reverse();

    Resolution {
        order: order.into_iter().map(|n| node_map[n].clone()).collect(),
        warnings,
    }
}

/// Map each package name to the names of the packages that depend on it.
///
/// Only catalog-resolvable edges are included. Shared by the dirty tracker
/// (propagation) and the stage scheduler (dependent-count ordering).
pub fn reverse_dependencies(packages: &[Package]) -> HashMap<String, Vec<String>> {
    let known: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    let mut reverse: HashMap<String, Vec<String>> = HashMap::new();
    for pkg in packages {
        for dep in &pkg.dependencies {
            if known.contains(dep.as_str()) {
                reverse
                    .entry(dep.clone())
                    .or_default()
                    .push(pkg.name.clone());
            }
        }
    }
    reverse
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_package;

    fn position(order: &[Package], name: &str) -> usize {
        order
            .iter()
            .position(|p| p.name == name)
            .unwrap_or_else(|| panic!("{name} missing from order"))
    }

    #[test]
    fn test_dependency_first_order() {
        let packages = vec![
            make_package("app", &["core"]),
            make_package("core", &["util"]),
            make_package("util", &[]),
        ];

        let resolution = resolve(&packages);
        let names: Vec<_> = resolution.order.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["util", "core", "app"]);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_diamond_dependencies() {
        let packages = vec![
            make_package("app", &["left", "right"]),
            make_package("left", &["base"]),
            make_package("right", &["base"]),
            make_package("base", &[]),
        ];

        let resolution = resolve(&packages);
        let order = &resolution.order;

        assert!(position(order, "base") < position(order, "left"));
        assert!(position(order, "base") < position(order, "right"));
        assert!(position(order, "left") < position(order, "app"));
        assert!(position(order, "right") < position(order, "app"));
    }

    #[test]
    fn test_cycle_returns_all_packages_with_warning() {
        let packages = vec![make_package("a", &["b"]), make_package("b", &["a"])];

        let resolution = resolve(&packages);
        let mut names: Vec<_> = resolution.order.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();

        assert_eq!(names, vec!["a", "b"]);
        assert!(resolution.warnings.iter().any(|w| w.contains("cycle")));
    }

    #[test]
    fn test_self_cycle_is_tolerated() {
        let packages = vec![make_package("selfish", &["selfish"])];

        let resolution = resolve(&packages);
        assert_eq!(resolution.order.len(), 1);
        assert!(resolution.warnings.iter().any(|w| w.contains("cycle")));
    }

    #[test]
    fn test_missing_dependency_warns_and_keeps_dependent_schedulable() {
        let packages = vec![make_package("web", &["no-such-pkg"])];

        let resolution = resolve(&packages);
        assert_eq!(resolution.order.len(), 1);
        assert_eq!(resolution.order[0].name, "web");
        assert!(resolution.warnings[0].contains("no-such-pkg"));
        assert!(resolution.warnings[0].contains("doesn't exist"));
    }

    #[test]
    fn test_cycle_members_and_acyclic_packages_coexist() {
        let packages = vec![
            make_package("a", &["b"]),
            make_package("b", &["a"]),
            make_package("free", &[]),
        ];

        let resolution = resolve(&packages);
        assert_eq!(resolution.order.len(), 3);
    }

    #[test]
    fn test_reverse_dependencies() {
        let packages = vec![
            make_package("app", &["core", "util"]),
            make_package("core", &["util"]),
            make_package("util", &[]),
        ];

        let reverse = reverse_dependencies(&packages);
        let mut util_dependents = reverse["util"].clone();
        util_dependents.sort_unstable();

        assert_eq!(util_dependents, vec!["app", "core"]);
        assert_eq!(reverse["core"], vec!["app"]);
        assert!(!reverse.contains_key("app"));
    }

    mod properties {
        use super::*;
        use crate::test_utils::generators::{acyclic_catalog, arbitrary_catalog};
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(
                crate::config::defaults::MIN_PROPTEST_ITERATIONS
            ))]

            /// Every dependency precedes its dependent in acyclic graphs.
            #[test]
            fn topological_validity(packages in acyclic_catalog()) {
                let resolution = resolve(&packages);
                let index: std::collections::HashMap<_, _> = resolution
                    .order
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (p.name.clone(), i))
                    .collect();

                for pkg in &packages {
                    for dep in &pkg.dependencies {
                        if let Some(dep_idx) = index.get(dep) {
                            prop_assert!(dep_idx < &index[&pkg.name]);
                        }
                    }
                }
            }

            /// The resolver terminates and returns a permutation for any
            /// graph, including self-cycles and multi-node cycles.
            #[test]
            fn cycle_liveness(packages in arbitrary_catalog()) {
                let resolution = resolve(&packages);
                prop_assert_eq!(resolution.order.len(), packages.len());

                let mut returned: Vec<_> =
                    resolution.order.iter().map(|p| p.name.clone()).collect();
                let mut expected: Vec<_> =
                    packages.iter().map(|p| p.name.clone()).collect();
                returned.sort_unstable();
                expected.sort_unstable();
                prop_assert_eq!(returned, expected);
            }
        }
    }
}
