//! Edge discovery
//!
//! Four strategies run in a fixed order over the whole node set and only
//! ever add edges:
//!
//! 1. import library named in another project's link inputs
//! 2. type library `#import`ed from a project that compiles it
//! 3. reference assembly matching another project's output
//! 4. explicit manifest directives
//!
//! Lookups keep the first producer in arena (full-path) order.

use std::collections::HashMap;
use std::time::Instant;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{error, info, warn};

use super::graph::{DependencyKind, ProjectGraph};
use crate::shared::models::{ExtraDependencyDirective, ProjectNode};
use crate::shared::utils::file_stem_of;

/// Edges added per strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EdgeStats {
    pub link_library: usize,
    pub type_library: usize,
    pub assembly_reference: usize,
    pub explicit: usize,
    pub rejected_directives: usize,
    pub cycles: usize,
}

impl EdgeStats {
    pub fn total(&self) -> usize {
        self.link_library + self.type_library + self.assembly_reference + self.explicit
    }
}

/// Builds a [`ProjectGraph`] from registered nodes
#[derive(Debug, Clone, Default)]
pub struct DependencyGraphBuilder {
    directives: Vec<ExtraDependencyDirective>,
}

impl DependencyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directives(mut self, directives: Vec<ExtraDependencyDirective>) -> Self {
        self.directives = directives;
        self
    }

    /// Arena the nodes and run every strategy
    pub fn build(&self, nodes: Vec<ProjectNode>) -> (ProjectGraph, EdgeStats) {
        let start = Instant::now();
        let mut graph = ProjectGraph::new(nodes);
        let mut stats = EdgeStats {
            link_library: link_library_edges(&mut graph),
            type_library: type_library_edges(&mut graph),
            assembly_reference: assembly_reference_edges(&mut graph),
            ..Default::default()
        };
        let (explicit, rejected) = explicit_edges(&mut graph, &self.directives);
        stats.explicit = explicit;
        stats.rejected_directives = rejected;
        stats.cycles = report_cycles(&graph);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            link_library = stats.link_library,
            type_library = stats.type_library,
            assembly_reference = stats.assembly_reference,
            explicit = stats.explicit,
            cycles = stats.cycles,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dependency discovery complete"
        );
        (graph, stats)
    }
}

/// Strategy 1: `AdditionalDependencies` → import library producer
pub fn link_library_edges(graph: &mut ProjectGraph) -> usize {
    let mut producers: HashMap<String, NodeIndex> = HashMap::new();
    for (idx, node) in graph.nodes() {
        if let Some(import) = node.native.as_ref().and_then(|n| n.import_library.as_ref()) {
            if !import.is_empty() {
                producers.entry(import.to_lowercase()).or_insert(idx);
            }
        }
    }

    let wanted: Vec<(NodeIndex, NodeIndex)> = graph
        .nodes()
        .flat_map(|(idx, node)| {
            node.native
                .iter()
                .flat_map(|n| n.input_libraries.iter())
                .filter_map(|lib| producers.get(lib).map(|&to| (idx, to)))
                .collect::<Vec<_>>()
        })
        .collect();

    add_all(graph, wanted, DependencyKind::LinkLibrary)
}

/// Strategy 2: `#import`ed type library → project compiling it
pub fn type_library_edges(graph: &mut ProjectGraph) -> usize {
    let mut producers: HashMap<String, NodeIndex> = HashMap::new();
    for (idx, node) in graph.nodes() {
        if let Some(tlb) = node.native.as_ref().and_then(|n| n.type_library.as_ref()) {
            let stem = file_stem_of(tlb).to_lowercase();
            if !stem.is_empty() {
                producers.entry(stem).or_insert(idx);
            }
        }
    }

    let wanted: Vec<(NodeIndex, NodeIndex)> = graph
        .nodes()
        .flat_map(|(idx, node)| {
            node.native
                .iter()
                .flat_map(|n| n.input_type_libraries.iter())
                .filter_map(|name| {
                    let stem = file_stem_of(name).to_lowercase();
                    producers
                        .get(&stem)
                        .or_else(|| producers.get(&name.to_lowercase()))
                        .map(|&to| (idx, to))
                })
                .collect::<Vec<_>>()
        })
        .collect();

    add_all(graph, wanted, DependencyKind::TypeLibrary)
}

/// Strategy 3: reference assembly → project producing it
///
/// Names with no producer are prebuilt binaries and produce nothing.
pub fn assembly_reference_edges(graph: &mut ProjectGraph) -> usize {
    let mut producers: HashMap<String, NodeIndex> = HashMap::new();
    for (idx, node) in graph.nodes() {
        if !node.output_name.is_empty() {
            producers.entry(dll_key(&node.output_name)).or_insert(idx);
        }
    }

    let wanted: Vec<(NodeIndex, NodeIndex)> = graph
        .nodes()
        .flat_map(|(idx, node)| {
            node.reference_assemblies
                .iter()
                .filter_map(|name| producers.get(&dll_key(name)).map(|&to| (idx, to)))
                .collect::<Vec<_>>()
        })
        .collect();

    add_all(graph, wanted, DependencyKind::AssemblyReference)
}

/// Strategy 4: manifest directives, matched on descriptor file name
///
/// Returns `(edges added, directives rejected)`.
pub fn explicit_edges(
    graph: &mut ProjectGraph,
    directives: &[ExtraDependencyDirective],
) -> (usize, usize) {
    let mut by_file_name: HashMap<String, NodeIndex> = HashMap::new();
    for (idx, node) in graph.nodes() {
        by_file_name.entry(node.file_name().to_lowercase()).or_insert(idx);
    }

    let mut wanted = Vec::new();
    let mut rejected = 0;
    for directive in directives {
        let missing = [&directive.project, &directive.depends_on]
            .into_iter()
            .find(|path| !path.is_file());
        if let Some(path) = missing {
            error!(
                project = %directive.project.display(),
                depends_on = %directive.depends_on.display(),
                missing = %path.display(),
                "Dependency directive names a file that does not exist, skipped"
            );
            rejected += 1;
            continue;
        }

        let from = file_name_key(&directive.project).and_then(|k| by_file_name.get(&k));
        let to = file_name_key(&directive.depends_on).and_then(|k| by_file_name.get(&k));
        if let (Some(&from), Some(&to)) = (from, to) {
            wanted.push((from, to));
        }
    }

    (add_all(graph, wanted, DependencyKind::Explicit), rejected)
}

/// Log each strongly connected component; returns how many there are
pub fn report_cycles(graph: &ProjectGraph) -> usize {
    let cycles = graph.cycles();
    for cycle in &cycles {
        let members: Vec<String> = cycle.iter().map(|&idx| graph.node(idx).file_name()).collect();
        warn!(members = %members.join(" -> "), "Dependency cycle");
    }
    cycles.len()
}

fn add_all(graph: &mut ProjectGraph, wanted: Vec<(NodeIndex, NodeIndex)>, kind: DependencyKind) -> usize {
    wanted
        .into_iter()
        .filter(|&(from, to)| graph.add_dependency(from, to, kind))
        .count()
}

/// Lowercase name with `.dll` appended when missing
fn dll_key(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with(".dll") {
        lower
    } else {
        format!("{}.dll", lower)
    }
}

fn file_name_key(path: &std::path::Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{NativeOutputs, ProjectKind};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn native(path: &str, output: &str, outputs: NativeOutputs) -> ProjectNode {
        let mut node = ProjectNode::new(PathBuf::from(path), ProjectKind::Native);
        node.output_name = output.to_string();
        node.native = Some(outputs);
        node
    }

    fn managed(path: &str, output: &str, refs: &[&str]) -> ProjectNode {
        let mut node = ProjectNode::new(PathBuf::from(path), ProjectKind::Managed);
        node.output_name = output.to_string();
        for r in refs {
            node.add_reference_assembly(*r);
        }
        node
    }

    fn idx(graph: &ProjectGraph, path: &str) -> NodeIndex {
        graph.find_by_path(path).unwrap()
    }

    #[test]
    fn test_link_library_edge_one_direction() {
        let x = native(
            "/t/x.vcxproj",
            "x.dll",
            NativeOutputs {
                import_library: Some("x.lib".into()),
                input_libraries: vec!["foo.lib".into(), "kernel32.lib".into()],
                ..Default::default()
            },
        );
        let y = native(
            "/t/y.vcxproj",
            "foo.dll",
            NativeOutputs {
                import_library: Some("foo.lib".into()),
                ..Default::default()
            },
        );

        let (graph, stats) = DependencyGraphBuilder::new().build(vec![y, x]);
        let (x, y) = (idx(&graph, "/t/x.vcxproj"), idx(&graph, "/t/y.vcxproj"));
        assert!(graph.depends_on(x, y));
        assert!(!graph.depends_on(y, x));
        assert_eq!(stats.link_library, 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_static_library_self_reference_ignored() {
        let lib = native(
            "/t/base.vcxproj",
            "base.lib",
            NativeOutputs {
                import_library: Some("base.lib".into()),
                input_libraries: vec!["base.lib".into()],
                ..Default::default()
            },
        );
        let (graph, _) = DependencyGraphBuilder::new().build(vec![lib]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_type_library_edges_need_producer() {
        let producer = native(
            "/t/shapes.vcxproj",
            "shapes.dll",
            NativeOutputs {
                type_library: Some("shapes.tlb".into()),
                ..Default::default()
            },
        );
        let consumer = native(
            "/t/canvas.vcxproj",
            "canvas.dll",
            NativeOutputs {
                input_type_libraries: vec!["shapes".into(), "widgets".into()],
                ..Default::default()
            },
        );
        let declares_only = native("/t/widgets.vcxproj", "widgets.dll", NativeOutputs::default());

        let (graph, stats) = DependencyGraphBuilder::new().build(vec![producer, consumer, declares_only]);
        let canvas = idx(&graph, "/t/canvas.vcxproj");
        assert!(graph.depends_on(canvas, idx(&graph, "/t/shapes.vcxproj")));
        assert!(!graph.depends_on(canvas, idx(&graph, "/t/widgets.vcxproj")));
        assert_eq!(stats.type_library, 1);
    }

    #[test]
    fn test_assembly_reference_edges() {
        let core = managed("/t/core/core.csproj", "core.dll", &[]);
        let bridge = native("/t/bridge/bridge.vcxproj", "bridge.dll", NativeOutputs::default());
        let app = managed(
            "/t/app/app.csproj",
            "app.exe",
            &["core", "bridge.dll", "system.xml"],
        );

        let (graph, stats) = DependencyGraphBuilder::new().build(vec![core, bridge, app]);
        let app = idx(&graph, "/t/app/app.csproj");
        assert_eq!(
            graph.dependencies(app),
            vec![idx(&graph, "/t/core/core.csproj"), idx(&graph, "/t/bridge/bridge.vcxproj")]
        );
        assert_eq!(stats.assembly_reference, 2);
    }

    #[test]
    fn test_explicit_directives() {
        let dir = TempDir::new().unwrap();
        let a_path = dir.path().join("a.csproj");
        let b_path = dir.path().join("b.csproj");
        std::fs::write(&a_path, "").unwrap();
        std::fs::write(&b_path, "").unwrap();

        let a = managed(a_path.to_str().unwrap(), "a.dll", &[]);
        let b = managed(b_path.to_str().unwrap(), "b.dll", &[]);
        let directives = vec![
            ExtraDependencyDirective::new(a_path.clone(), b_path.clone()),
            ExtraDependencyDirective::new(a_path.clone(), dir.path().join("gone.csproj")),
        ];

        let (graph, stats) = DependencyGraphBuilder::new()
            .with_directives(directives)
            .build(vec![a, b]);

        assert_eq!(stats.explicit, 1);
        assert_eq!(stats.rejected_directives, 1);
        let a = idx(&graph, a_path.to_str().unwrap());
        let b = idx(&graph, b_path.to_str().unwrap());
        assert!(graph.depends_on(a, b));
        assert_eq!(graph.edge_kind(a, b), Some(DependencyKind::Explicit));
    }

    #[test]
    fn test_explicit_directive_matches_file_name_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let a_path = dir.path().join("sub").join("A.csproj");
        let b_path = dir.path().join("b.csproj");
        std::fs::create_dir_all(a_path.parent().unwrap()).unwrap();
        std::fs::write(&a_path, "").unwrap();
        std::fs::write(&b_path, "").unwrap();
        let other_a = dir.path().join("a.CSPROJ");
        std::fs::write(&other_a, "").unwrap();

        let a = managed(a_path.to_str().unwrap(), "a.dll", &[]);
        let b = managed(b_path.to_str().unwrap(), "b.dll", &[]);
        let (graph, stats) = DependencyGraphBuilder::new()
            .with_directives(vec![ExtraDependencyDirective::new(other_a, b_path.clone())])
            .build(vec![a, b]);

        assert_eq!(stats.explicit, 1);
        assert!(graph.depends_on(
            idx(&graph, a_path.to_str().unwrap()),
            idx(&graph, b_path.to_str().unwrap())
        ));
    }

    #[test]
    fn test_cycles_counted_not_fatal() {
        let a = managed("/t/a.csproj", "a.dll", &["b"]);
        let b = managed("/t/b.csproj", "b.dll", &["a"]);
        let (graph, stats) = DependencyGraphBuilder::new().build(vec![a, b]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(stats.cycles, 1);
    }
}
