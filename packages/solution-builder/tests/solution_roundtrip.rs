//! Solution files read back to the graph they were rendered from

use std::collections::BTreeSet;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use solution_builder::features::emission::{parse_solution, render_solution, SolutionOptions};
use solution_builder::{BuildClosure, ClosureMode, DependencyKind, ProjectGraph, ProjectKind, ProjectNode};

fn graph_with(n: usize, edges: &[(usize, usize)]) -> ProjectGraph {
    let nodes = (0..n)
        .map(|i| {
            let kind = if i % 3 == 0 { ProjectKind::Native } else { ProjectKind::Managed };
            let ext = if kind == ProjectKind::Native { "vcxproj" } else { "csproj" };
            let mut node = ProjectNode::new(PathBuf::from(format!("/src/p{:02}/P{:02}.{}", i, i, ext)), kind);
            node.name = format!("P{:02}", i);
            node.project_id = format!("{{00000000-0000-0000-0000-{:012}}}", i);
            node
        })
        .collect();
    let mut graph = ProjectGraph::new(nodes);
    let indices: Vec<_> = graph.indices().collect();
    for &(from, to) in edges {
        graph.add_dependency(indices[from % n], indices[to % n], DependencyKind::Explicit);
    }
    graph
}

fn options(inline: bool) -> SolutionOptions {
    SolutionOptions {
        configuration: "Debug".to_string(),
        platform: "Win32".to_string(),
        inline_dependencies: inline,
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_recovers_projects_and_edges(
        n in 1usize..10,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..30),
    ) {
        let graph = graph_with(n, &edges);
        let closure = BuildClosure::compute(&graph, &ClosureMode::All);
        let parsed = parse_solution(&render_solution(&graph, &closure, &options(true))).unwrap();

        let rendered: Vec<(String, PathBuf)> = closure
            .in_build
            .iter()
            .map(|&idx| (graph.node(idx).project_id.clone(), graph.node(idx).full_path.clone()))
            .collect();
        let recovered: Vec<(String, PathBuf)> = parsed
            .projects
            .iter()
            .map(|p| (p.project_id.clone(), p.path.clone()))
            .collect();
        prop_assert_eq!(rendered, recovered);

        let expected: BTreeSet<(PathBuf, PathBuf)> = graph
            .edges()
            .into_iter()
            .map(|(a, b)| (graph.node(a).full_path.clone(), graph.node(b).full_path.clone()))
            .collect();
        let actual: BTreeSet<(PathBuf, PathBuf)> = parsed.edges().into_iter().collect();
        prop_assert_eq!(parsed.edge_count(), graph.edge_count());
        prop_assert_eq!(expected, actual);
    }
}

#[test]
fn test_roundtrip_without_inlined_dependencies() {
    let graph = graph_with(4, &[(0, 1), (1, 2), (2, 3)]);
    let closure = BuildClosure::compute(&graph, &ClosureMode::All);
    let parsed = parse_solution(&render_solution(&graph, &closure, &options(false))).unwrap();

    assert_eq!(parsed.projects.len(), 4);
    assert_eq!(parsed.edge_count(), 0);
    assert_eq!(parsed.configurations, vec!["Debug|Win32".to_string()]);
}

#[test]
fn test_roundtrip_keeps_only_in_build_projects() {
    let graph = graph_with(5, &[(1, 2), (3, 4)]);
    let closure = BuildClosure::compute(&graph, &ClosureMode::Seeded(vec![PathBuf::from("/src/p01/p01.csproj")]));
    let parsed = parse_solution(&render_solution(&graph, &closure, &options(true))).unwrap();

    let names: Vec<&str> = parsed.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P01", "P02"]);
    assert_eq!(
        parsed.edges(),
        vec![(PathBuf::from("/src/p01/P01.csproj"), PathBuf::from("/src/p02/P02.csproj"))]
    );
}
