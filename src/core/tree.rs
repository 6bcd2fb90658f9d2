//! Dependency graph visualization
//!
//! Renders the package graph as a unicode tree rooted at the packages
//! nothing depends on, or as a Graphviz DOT document, plus a small
//! statistics summary.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;

use crate::core::workspace::{Package, Workspace};

/// Node fill colors per package type in DOT output
const TYPE_COLORS: &[(&str, &str)] = &[
    ("app", "lightblue"),
    ("lib", "lightgreen"),
    ("service", "lightyellow"),
    ("tool", "lightcoral"),
];

/// A renderable view over the dependency graph
#[derive(Debug, Default)]
pub struct GraphView {
    /// Package → declared dependencies, sorted by package name
    dep_map: BTreeMap<String, Vec<String>>,
    /// Package → type name, where resolvable
    types: HashMap<String, String>,
    /// Package → version string
    versions: HashMap<String, String>,
}

impl GraphView {
    /// Build the view from a loaded workspace
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let mut view = Self::default();
        for pkg in &workspace.packages {
            view.dep_map
                .insert(pkg.name.clone(), pkg.dependencies.clone());
            view.versions.insert(pkg.name.clone(), pkg.version.clone());
            if let Some((type_name, _)) = workspace.package_type(pkg) {
                view.types.insert(pkg.name.clone(), type_name.to_string());
            }
        }
        view
    }

    /// Build the view from bare packages (no type annotations)
    pub fn from_packages(packages: &[Package]) -> Self {
        let mut view = Self::default();
        for pkg in packages {
            view.dep_map
                .insert(pkg.name.clone(), pkg.dependencies.clone());
            view.versions.insert(pkg.name.clone(), pkg.version.clone());
        }
        view
    }

    /// True when there are no packages to render
    pub fn is_empty(&self) -> bool {
        self.dep_map.is_empty()
    }

    /// Packages that no other package depends on. When every package has a
    /// dependent (everything sits on cycles), all packages become roots.
    fn roots(&self) -> Vec<&str> {
        let mut has_dependent: HashSet<&str> = HashSet::new();
        for deps in self.dep_map.values() {
            for dep in deps {
                has_dependent.insert(dep.as_str());
            }
        }

        let roots: Vec<&str> = self
            .dep_map
            .keys()
            .map(String::as_str)
            .filter(|name| !has_dependent.contains(name))
            .collect();

        if roots.is_empty() {
            self.dep_map.keys().map(String::as_str).collect()
        } else {
            roots
        }
    }

    fn label(&self, name: &str, show_types: bool) -> String {
        let mut label = name.to_string();
        if show_types {
            if let Some(type_name) = self.types.get(name).filter(|t| !t.is_empty()) {
                let _ = write!(label, " ({type_name})");
            }
            if let Some(version) = self.versions.get(name).filter(|v| !v.is_empty()) {
                let _ = write!(label, " v{version}");
            }
        }
        label
    }

    /// Render the dependency tree
    pub fn format_tree(&self, show_types: bool) -> String {
        let mut output = String::new();
        for (i, root) in self.roots().iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            self.format_node(&mut output, root, "", show_types, &mut HashSet::new());
        }
        output
    }

    fn format_node(
        &self,
        output: &mut String,
        node: &str,
        prefix: &str,
        show_types: bool,
        visited: &mut HashSet<String>,
    ) {
        if visited.contains(node) {
            let _ = writeln!(output, "{prefix}├─ {node} (circular reference)");
            return;
        }
        visited.insert(node.to_string());

        let _ = writeln!(output, "{prefix}├─ {}", self.label(node, show_types));

        if let Some(deps) = self.dep_map.get(node) {
            for (i, dep) in deps.iter().enumerate() {
                let child_prefix = if i == deps.len() - 1 {
                    format!("{prefix}   ")
                } else {
                    format!("{prefix}│  ")
                };
                self.format_node(output, dep, &child_prefix, show_types, visited);
            }
        }

        visited.remove(node);
    }

    /// Render the graph as a Graphviz DOT document
    pub fn format_dot(&self, show_types: bool) -> String {
        let mut output = String::new();
        output.push_str("digraph dependencies {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box, style=rounded];\n");
        output.push_str("  edge [color=gray];\n\n");

        for name in self.dep_map.keys() {
            let mut label = name.clone();
            if show_types {
                if let Some(version) = self.versions.get(name).filter(|v| !v.is_empty()) {
                    let _ = write!(label, "\\nv{version}");
                }
                if let Some(type_name) = self.types.get(name).filter(|t| !t.is_empty()) {
                    let _ = write!(label, "\\n({type_name})");
                }
            }

            let color = self
                .types
                .get(name)
                .and_then(|t| {
                    TYPE_COLORS
                        .iter()
                        .find(|(type_name, _)| *type_name == t.as_str())
                        .map(|(_, color)| *color)
                })
                .unwrap_or("white");

            let _ = writeln!(
                output,
                "  \"{name}\" [label=\"{label}\", fillcolor={color}, style=\"rounded,filled\"];"
            );
        }

        output.push('\n');
        for (name, deps) in &self.dep_map {
            for dep in deps {
                let _ = writeln!(output, "  \"{name}\" -> \"{dep}\";");
            }
        }

        output.push_str("}\n");
        output
    }

    /// Summarize the graph: counts and the heaviest dependers
    pub fn statistics(&self) -> GraphStats {
        let total_dependencies = self.dep_map.values().map(Vec::len).sum();

        let mut heaviest: Vec<(String, usize)> = self
            .dep_map
            .iter()
            .filter(|(_, deps)| !deps.is_empty())
            .map(|(name, deps)| (name.clone(), deps.len()))
            .collect();
        heaviest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        heaviest.truncate(3);

        GraphStats {
            package_count: self.dep_map.len(),
            total_dependencies,
            heaviest_dependers: heaviest,
        }
    }
}

/// Counts reported beneath the graph output
#[derive(Debug)]
pub struct GraphStats {
    /// Number of packages in the graph
    pub package_count: usize,
    /// Sum of all declared dependency references
    pub total_dependencies: usize,
    /// Up to three packages with the most direct dependencies
    pub heaviest_dependers: Vec<(String, usize)>,
}

impl GraphStats {
    /// Average declared dependencies per package
    pub fn average_dependencies(&self) -> f64 {
        if self.package_count == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                self.total_dependencies as f64 / self.package_count as f64
            }
        }
    }
}
