//! Stage scheduling
//!
//! Partitions a build order into sequential stages, each stage being a
//! maximal set of packages whose dependencies were all scheduled in earlier
//! stages. Packages inside a stage are safe to build concurrently.

use std::collections::{HashMap, HashSet};

use crate::core::workspace::Package;

/// The staged execution plan plus scheduling warnings
#[derive(Debug)]
pub struct StagePlan {
    /// Ordered stages; every package appears in exactly one stage
    pub stages: Vec<Vec<Package>>,
    /// Warnings raised while planning (forced cycle breaks)
    pub warnings: Vec<String>,
}

impl StagePlan {
    /// Total number of packages across all stages
    pub fn package_count(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }
}

/// Group packages into maximal parallel stages.
///
/// Each round selects every unscheduled package whose dependencies are no
/// longer in the unscheduled set (dependencies outside the input set never
/// block). Within a stage, packages with more direct dependents are listed
/// first so the longest downstream chains start earliest. If a round selects
/// nothing while packages remain, one arbitrary package is force-selected to
/// break the deadlock, so planning terminates in at most N rounds.
pub fn plan(order: &[Package]) -> StagePlan {
    let mut warnings = Vec::new();

    let depends_on: HashMap<&str, HashSet<&str>> = order
        .iter()
        .map(|pkg| {
            (
                pkg.name.as_str(),
                pkg.dependencies.iter().map(String::as_str).collect(),
            )
        })
        .collect();

    let mut dependent_count: HashMap<&str, usize> = HashMap::new();
    for deps in depends_on.values() {
        for &dep in deps {
            *dependent_count.entry(dep).or_default() += 1;
        }
    }

    let mut remaining: HashSet<&str> = order.iter().map(|p| p.name.as_str()).collect();
    let mut stages: Vec<Vec<Package>> = Vec::new();

    while !remaining.is_empty() {
        let mut stage: Vec<&Package> = order
            .iter()
            .filter(|pkg| remaining.contains(pkg.name.as_str()))
            .filter(|pkg| {
                depends_on[pkg.name.as_str()]
                    .iter()
                    .all(|dep| !remaining.contains(dep))
            })
            .collect();

        if stage.is_empty() {
            // Deadlocked on a cycle: force one package through and let the
            // next rounds drain its dependents.
            let stuck = order
                .iter()
                .find(|pkg| remaining.contains(pkg.name.as_str()))
                .expect("remaining is non-empty");
            warnings.push(format!(
                "Possible dependency cycle detected. Forcing {} into the current stage.",
                stuck.name
            ));
            stage.push(stuck);
        }

        stage.sort_by(|a, b| {
            let a_count = dependent_count.get(a.name.as_str()).copied().unwrap_or(0);
            let b_count = dependent_count.get(b.name.as_str()).copied().unwrap_or(0);
            b_count.cmp(&a_count)
        });

        for pkg in &stage {
            remaining.remove(pkg.name.as_str());
        }

        stages.push(stage.into_iter().cloned().collect());
    }

    StagePlan { stages, warnings }
}
