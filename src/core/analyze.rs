//! Workspace health analysis
//!
//! Computes a structured report over the catalog: totals, type
//! distribution, circular dependencies, orphaned packages, the critical
//! (longest) dependency chain, and per-package issues with suggestions.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::core::workspace::{Package, Workspace};

/// How many direct dependencies counts as excessive for one package
const HIGH_DEPENDENCY_COUNT: usize = 10;

/// Average dependencies per package above which an architectural review is
/// suggested
const HIGH_AVERAGE_DEPENDENCIES: f64 = 5.0;

/// Health report for one package
#[derive(Debug, Serialize)]
pub struct PackageAnalysis {
    /// Package name
    pub name: String,
    /// Resolved package type, empty when unresolvable
    #[serde(rename = "type")]
    pub package_type: String,
    /// Declared version
    pub version: String,
    /// Path of the package config file
    pub path: String,
    /// Declared dependencies
    pub dependencies: Vec<String>,
    /// Packages depending on this one
    pub dependents: Vec<String>,
    /// Detected problems
    pub issues: Vec<String>,
    /// Matching improvement suggestions
    pub suggestions: Vec<String>,
    /// Number of non-hidden files in the package directory
    pub file_count: usize,
    /// Total size of those files in bytes
    pub size_bytes: u64,
}

/// Health report for the whole workspace
#[derive(Debug, Serialize)]
pub struct WorkspaceAnalysis {
    /// Number of packages in the catalog
    pub total_packages: usize,
    /// Package count per resolved type
    pub packages_by_type: BTreeMap<String, usize>,
    /// Sum of declared dependency references
    pub total_dependencies: usize,
    /// Detected dependency cycles, each as the path that closes the loop
    pub circular_dependencies: Vec<Vec<String>>,
    /// Packages nothing depends on
    pub orphan_packages: Vec<String>,
    /// Longest dependency chain in the workspace
    pub critical_path: Vec<String>,
    /// Per-package reports, keyed by name
    pub packages: BTreeMap<String, PackageAnalysis>,
    /// Workspace-level problems
    pub workspace_issues: Vec<String>,
    /// Workspace-level suggestions
    pub workspace_suggestions: Vec<String>,
}

impl WorkspaceAnalysis {
    /// Average declared dependencies per package
    pub fn average_dependencies(&self) -> f64 {
        if self.total_packages == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                self.total_dependencies as f64 / self.total_packages as f64
            }
        }
    }
}

/// Analyze a loaded workspace
pub fn analyze(workspace: &Workspace) -> WorkspaceAnalysis {
    let dep_map: HashMap<&str, &[String]> = workspace
        .packages
        .iter()
        .map(|p| (p.name.as_str(), p.dependencies.as_slice()))
        .collect();

    let mut dependent_map: HashMap<&str, Vec<&str>> = HashMap::new();
    for pkg in &workspace.packages {
        for dep in &pkg.dependencies {
            dependent_map
                .entry(dep.as_str())
                .or_default()
                .push(pkg.name.as_str());
        }
    }

    let mut packages_by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut packages: BTreeMap<String, PackageAnalysis> = BTreeMap::new();
    let mut total_dependencies = 0;

    for pkg in &workspace.packages {
        total_dependencies += pkg.dependencies.len();

        let report = analyze_package(workspace, pkg, &dependent_map);
        if !report.package_type.is_empty() {
            *packages_by_type.entry(report.package_type.clone()).or_default() += 1;
        }
        packages.insert(pkg.name.clone(), report);
    }

    let circular_dependencies = detect_cycles(&dep_map);

    let mut orphan_packages: Vec<String> = workspace
        .packages
        .iter()
        .filter(|p| !dependent_map.contains_key(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect();
    orphan_packages.sort_unstable();

    let critical_path = find_critical_path(&dep_map);

    let mut analysis = WorkspaceAnalysis {
        total_packages: workspace.packages.len(),
        packages_by_type,
        total_dependencies,
        circular_dependencies,
        orphan_packages,
        critical_path,
        packages,
        workspace_issues: Vec::new(),
        workspace_suggestions: Vec::new(),
    };

    let (issues, suggestions) = workspace_suggestions(&analysis);
    analysis.workspace_issues = issues;
    analysis.workspace_suggestions = suggestions;

    analysis
}

fn analyze_package(
    workspace: &Workspace,
    pkg: &Package,
    dependent_map: &HashMap<&str, Vec<&str>>,
) -> PackageAnalysis {
    let package_type = workspace
        .package_type(pkg)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let (file_count, size_bytes) = package_files(pkg.dir());

    let mut dependents: Vec<String> = dependent_map
        .get(pkg.name.as_str())
        .map(|d| d.iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    dependents.sort_unstable();

    let mut report = PackageAnalysis {
        name: pkg.name.clone(),
        package_type,
        version: pkg.version.clone(),
        path: pkg.config_path.display().to_string(),
        dependencies: pkg.dependencies.clone(),
        dependents,
        issues: Vec::new(),
        suggestions: Vec::new(),
        file_count,
        size_bytes,
    };

    package_health(workspace, pkg, &mut report);
    report
}

/// Count non-hidden files and their combined size
fn package_files(dir: &Path) -> (usize, u64) {
    let mut count = 0;
    let mut size = 0;

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let hidden = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }
        count += 1;
        size += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }

    (count, size)
}

fn package_health(workspace: &Workspace, pkg: &Package, report: &mut PackageAnalysis) {
    if pkg.version.is_empty() {
        report.issues.push("No version specified".to_string());
        report
            .suggestions
            .push("Add a version field to track releases".to_string());
    }

    if pkg.dependencies.len() > HIGH_DEPENDENCY_COUNT {
        report.issues.push(format!(
            "High number of dependencies ({})",
            pkg.dependencies.len()
        ));
        report
            .suggestions
            .push("Consider reducing dependencies or splitting the package".to_string());
    }

    if !pkg.dir().join("README.md").exists() {
        report.issues.push("Missing README.md".to_string());
        report
            .suggestions
            .push("Add a README.md file to document the package".to_string());
    }

    let has_build_command = pkg
        .targets
        .get("build")
        .is_some_and(|c| !c.is_empty())
        || workspace
            .package_type(pkg)
            .and_then(|(_, t)| t.targets.get("build"))
            .is_some_and(|c| !c.is_empty());
    if !has_build_command {
        report.issues.push("No build command configured".to_string());
        report
            .suggestions
            .push("Add a build target to the package or type configuration".to_string());
    }
}

/// Depth-first cycle collection over the declared dependency edges
fn detect_cycles(dep_map: &HashMap<&str, &[String]>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();

    let mut names: Vec<&str> = dep_map.keys().copied().collect();
    names.sort_unstable();

    for start in names {
        if visited.contains(start) {
            continue;
        }
        let mut rec_stack: HashSet<&str> = HashSet::new();
        let mut path: Vec<&str> = Vec::new();
        dfs_cycle(start, dep_map, &mut visited, &mut rec_stack, &mut path, &mut cycles);
    }

    cycles
}

fn dfs_cycle<'a>(
    node: &'a str,
    dep_map: &HashMap<&'a str, &'a [String]>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    let deps = dep_map.get(node).copied().unwrap_or_default();
    for dep in deps {
        let dep = dep.as_str();
        if !dep_map.contains_key(dep) {
            continue;
        }
        if !visited.contains(dep) {
            if dfs_cycle(dep, dep_map, visited, rec_stack, path, cycles) {
                return true;
            }
        } else if rec_stack.contains(dep) {
            if let Some(start) = path.iter().position(|p| *p == dep) {
                let mut cycle: Vec<String> =
                    path[start..].iter().map(ToString::to_string).collect();
                cycle.push(dep.to_string());
                cycles.push(cycle);
            }
            return true;
        }
    }

    path.pop();
    rec_stack.remove(node);
    false
}

/// Longest dependency chain, following declared edges depth-first with
/// cycle-safe visited tracking
fn find_critical_path(dep_map: &HashMap<&str, &[String]>) -> Vec<String> {
    fn dfs<'a>(
        node: &'a str,
        dep_map: &HashMap<&'a str, &'a [String]>,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Vec<String> {
        if visited.contains(node) {
            return path.iter().map(ToString::to_string).collect();
        }
        visited.insert(node);
        path.push(node);

        let mut longest: Vec<String> = path.iter().map(ToString::to_string).collect();
        let deps = dep_map.get(node).copied().unwrap_or_default();
        for dep in deps {
            if dep_map.contains_key(dep.as_str()) {
                let candidate = dfs(dep.as_str(), dep_map, visited, path);
                if candidate.len() > longest.len() {
                    longest = candidate;
                }
            }
        }

        path.pop();
        visited.remove(node);
        longest
    }

    let mut names: Vec<&str> = dep_map.keys().copied().collect();
    names.sort_unstable();

    let mut longest: Vec<String> = Vec::new();
    for name in names {
        let candidate = dfs(name, dep_map, &mut HashSet::new(), &mut Vec::new());
        if candidate.len() > longest.len() {
            longest = candidate;
        }
    }
    longest
}

fn workspace_suggestions(analysis: &WorkspaceAnalysis) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if !analysis.circular_dependencies.is_empty() {
        issues.push(format!(
            "Found {} circular dependencies",
            analysis.circular_dependencies.len()
        ));
        suggestions
            .push("Break circular dependencies by extracting common functionality".to_string());
    }

    if analysis.total_packages > 0
        && analysis.orphan_packages.len() > analysis.total_packages / 3
    {
        issues.push("High number of orphaned packages".to_string());
        suggestions.push(
            "Consider removing unused packages or adding them as dependencies".to_string(),
        );
    }

    if analysis.total_packages > 50 {
        suggestions.push(
            "Consider using package groups or namespaces for better organization".to_string(),
        );
    }

    if analysis.average_dependencies() > HIGH_AVERAGE_DEPENDENCIES {
        suggestions.push(
            "High average dependencies per package - consider architectural review".to_string(),
        );
    }

    (issues, suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::workspace::Workspace;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn sample_workspace(root: &Path) -> Workspace {
        write(
            root,
            "granite.toml",
            r#"
[types.lib]
package_dir = "packages/lib"

[types.lib.targets]
build = "make"
"#,
        );
        write(
            root,
            "packages/lib/util/granite.toml",
            "[package]\nname = \"util\"\nversion = \"1.0.0\"\n",
        );
        write(root, "packages/lib/util/README.md", "# util\n");
        write(
            root,
            "packages/lib/core/granite.toml",
            "[package]\nname = \"core\"\ndependencies = [\"util\"]\n",
        );
        Workspace::load(root).unwrap()
    }

    #[test]
    fn test_totals_and_type_distribution() {
        let tmp = TempDir::new().unwrap();
        let analysis = analyze(&sample_workspace(tmp.path()));

        assert_eq!(analysis.total_packages, 2);
        assert_eq!(analysis.total_dependencies, 1);
        assert_eq!(analysis.packages_by_type["lib"], 2);
    }

    #[test]
    fn test_orphans_are_packages_without_dependents() {
        let tmp = TempDir::new().unwrap();
        let analysis = analyze(&sample_workspace(tmp.path()));

        // core depends on util, so only core is an orphan.
        assert_eq!(analysis.orphan_packages, vec!["core"]);
    }

    #[test]
    fn test_missing_version_and_readme_are_flagged() {
        let tmp = TempDir::new().unwrap();
        let analysis = analyze(&sample_workspace(tmp.path()));

        let core = &analysis.packages["core"];
        assert!(core.issues.iter().any(|i| i.contains("version")));
        assert!(core.issues.iter().any(|i| i.contains("README")));

        let util = &analysis.packages["util"];
        assert!(!util.issues.iter().any(|i| i.contains("version")));
        assert!(!util.issues.iter().any(|i| i.contains("README")));
    }

    #[test]
    fn test_missing_build_command_is_flagged() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "granite.toml", "[repo]\nname = \"ws\"\n");
        write(
            tmp.path(),
            "packages/stray/granite.toml",
            "[package]\nname = \"stray\"\nversion = \"0.1.0\"\n",
        );
        let analysis = analyze(&Workspace::load(tmp.path()).unwrap());

        let stray = &analysis.packages["stray"];
        assert!(stray.issues.iter().any(|i| i.contains("build command")));
    }

    #[test]
    fn test_cycles_are_reported() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "granite.toml", "[repo]\nname = \"ws\"\n");
        write(
            tmp.path(),
            "packages/a/granite.toml",
            "[package]\nname = \"a\"\nversion = \"1\"\ndependencies = [\"b\"]\n",
        );
        write(
            tmp.path(),
            "packages/b/granite.toml",
            "[package]\nname = \"b\"\nversion = \"1\"\ndependencies = [\"a\"]\n",
        );
        let analysis = analyze(&Workspace::load(tmp.path()).unwrap());

        assert_eq!(analysis.circular_dependencies.len(), 1);
        assert!(analysis
            .workspace_issues
            .iter()
            .any(|i| i.contains("circular")));
    }

    #[test]
    fn test_critical_path_is_the_longest_chain() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "granite.toml", "[repo]\nname = \"ws\"\n");
        for (name, deps) in [
            ("app", "[\"core\"]"),
            ("core", "[\"util\"]"),
            ("util", "[]"),
            ("lone", "[]"),
        ] {
            write(
                tmp.path(),
                &format!("packages/{name}/granite.toml"),
                &format!("[package]\nname = \"{name}\"\nversion = \"1\"\ndependencies = {deps}\n"),
            );
        }
        let analysis = analyze(&Workspace::load(tmp.path()).unwrap());

        assert_eq!(analysis.critical_path, vec!["app", "core", "util"]);
    }

    #[test]
    fn test_json_serialization() {
        let tmp = TempDir::new().unwrap();
        let analysis = analyze(&sample_workspace(tmp.path()));
        let json = serde_json::to_string_pretty(&analysis).unwrap();

        assert!(json.contains("\"total_packages\": 2"));
        assert!(json.contains("\"type\": \"lib\""));
    }
}
