//! Build closure
//!
//! Seeded mode walks outgoing edges depth-first from each seed with an
//! explicit stack; a visited set makes cycles harmless. All mode takes every
//! node without looking at edges.

use std::collections::HashSet;
use std::path::PathBuf;

use petgraph::graph::NodeIndex;
use tracing::{info, warn};

use crate::features::dependency_graph::ProjectGraph;
use crate::shared::utils::path_key;

/// How the closure is seeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosureMode {
    /// Official entry points (lowercase, normalized, existence-checked)
    Seeded(Vec<PathBuf>),
    /// Every discovered node is in the build
    All,
}

/// In-build / ignored partition of the node set
///
/// Both lists are sorted by full path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildClosure {
    pub in_build: Vec<NodeIndex>,
    pub ignored: Vec<NodeIndex>,

    /// Seeds with no matching node
    pub unmatched_seeds: Vec<PathBuf>,
}

impl BuildClosure {
    /// Partition `graph` according to `mode`
    pub fn compute(graph: &ProjectGraph, mode: &ClosureMode) -> Self {
        let mut closure = match mode {
            ClosureMode::All => Self {
                in_build: graph.indices().collect(),
                ..Default::default()
            },
            ClosureMode::Seeded(seeds) => Self::seeded(graph, seeds),
        };

        let members: HashSet<NodeIndex> = closure.in_build.iter().copied().collect();
        closure.ignored = graph.indices().filter(|idx| !members.contains(idx)).collect();

        let by_path = |a: &NodeIndex, b: &NodeIndex| graph.node(*a).full_path.cmp(&graph.node(*b).full_path);
        closure.in_build.sort_by(by_path);
        closure.ignored.sort_by(by_path);

        info!(
            in_build = closure.in_build.len(),
            ignored = closure.ignored.len(),
            unmatched_seeds = closure.unmatched_seeds.len(),
            "Build closure computed"
        );
        closure
    }

    fn seeded(graph: &ProjectGraph, seeds: &[PathBuf]) -> Self {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut in_build = Vec::new();
        let mut unmatched_seeds = Vec::new();

        for seed in seeds {
            let Some(start) = graph.find_by_path(&path_key(seed)) else {
                warn!(seed = %seed.display(), "Build list entry is not a discovered project");
                unmatched_seeds.push(seed.clone());
                continue;
            };

            let mut stack = vec![start];
            while let Some(idx) = stack.pop() {
                if !visited.insert(idx) {
                    continue;
                }
                in_build.push(idx);
                // Reversed so the first dependency is visited first.
                stack.extend(graph.dependencies(idx).into_iter().rev());
            }
        }

        Self {
            in_build,
            ignored: Vec::new(),
            unmatched_seeds,
        }
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.in_build.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.in_build.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_build.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dependency_graph::DependencyKind;
    use crate::shared::models::{ProjectKind, ProjectNode};

    fn graph(paths: &[&str]) -> ProjectGraph {
        ProjectGraph::new(
            paths
                .iter()
                .map(|p| ProjectNode::new(PathBuf::from(p), ProjectKind::Managed))
                .collect(),
        )
    }

    fn at(graph: &ProjectGraph, path: &str) -> NodeIndex {
        graph.find_by_path(path).unwrap()
    }

    #[test]
    fn test_seeded_closure_follows_edges() {
        let mut g = graph(&["/t/a.csproj", "/t/b.csproj", "/t/c.csproj", "/t/d.csproj"]);
        let (a, b, c, d) = (at(&g, "/t/a.csproj"), at(&g, "/t/b.csproj"), at(&g, "/t/c.csproj"), at(&g, "/t/d.csproj"));
        g.add_dependency(a, c, DependencyKind::Explicit);
        g.add_dependency(c, b, DependencyKind::Explicit);

        let closure = BuildClosure::compute(&g, &ClosureMode::Seeded(vec![PathBuf::from("/t/a.csproj")]));
        assert_eq!(closure.in_build, vec![a, b, c]);
        assert_eq!(closure.ignored, vec![d]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut g = graph(&["/t/a.csproj", "/t/b.csproj", "/t/c.csproj"]);
        let (a, b, c) = (at(&g, "/t/a.csproj"), at(&g, "/t/b.csproj"), at(&g, "/t/c.csproj"));
        g.add_dependency(a, b, DependencyKind::Explicit);
        g.add_dependency(b, c, DependencyKind::Explicit);
        g.add_dependency(c, a, DependencyKind::Explicit);

        let closure = BuildClosure::compute(&g, &ClosureMode::Seeded(vec![PathBuf::from("/t/a.csproj")]));
        assert_eq!(closure.in_build, vec![a, b, c]);
        assert!(closure.ignored.is_empty());
    }

    #[test]
    fn test_seed_matching_is_case_insensitive() {
        let g = graph(&["/T/App.csproj", "/T/Lib.csproj"]);
        let closure = BuildClosure::compute(
            &g,
            &ClosureMode::Seeded(vec![PathBuf::from("/t/app.csproj"), PathBuf::from("/t/zzz.csproj")]),
        );
        assert_eq!(closure.in_build, vec![at(&g, "/T/App.csproj")]);
        assert_eq!(closure.unmatched_seeds, vec![PathBuf::from("/t/zzz.csproj")]);
    }

    #[test]
    fn test_all_mode_ignores_edges() {
        let g = graph(&["/t/b.csproj", "/t/a.csproj"]);
        let closure = BuildClosure::compute(&g, &ClosureMode::All);
        assert_eq!(closure.len(), 2);
        assert!(closure.ignored.is_empty());
        assert_eq!(g.node(closure.in_build[0]).file_name(), "a.csproj");
    }
}
