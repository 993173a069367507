//! Project graph on petgraph
//!
//! Nodes live in a `DiGraph` arena in full-path order; edges are index
//! pairs (A → B means A depends on B). Cycles are representable and only
//! reported, never rejected.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use crate::shared::models::ProjectNode;

/// Which signal produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// `AdditionalDependencies` names another project's import library
    LinkLibrary,
    /// `#import` of a type library another project generates
    TypeLibrary,
    /// Reference assembly resolved to another project's output
    AssemblyReference,
    /// `ExtraDependencies` directive from the build manifest
    Explicit,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::LinkLibrary => "link_library",
            DependencyKind::TypeLibrary => "type_library",
            DependencyKind::AssemblyReference => "assembly_reference",
            DependencyKind::Explicit => "explicit",
        }
    }
}

/// Project dependency graph
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    graph: DiGraph<ProjectNode, DependencyKind>,

    /// Lowercase path → node index
    by_path: HashMap<String, NodeIndex>,
}

impl ProjectGraph {
    /// Arena of `nodes`, indexed in full-path order
    pub fn new(mut nodes: Vec<ProjectNode>) -> Self {
        nodes.sort_by(|a, b| a.full_path.cmp(&b.full_path));

        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len() * 2);
        let mut by_path = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let key = node.path_key();
            let idx = graph.add_node(node);
            by_path.entry(key).or_insert(idx);
        }

        Self { graph, by_path }
    }

    pub fn node(&self, idx: NodeIndex) -> &ProjectNode {
        &self.graph[idx]
    }

    /// Mutable access for in-run fixes; edges are untouched
    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut ProjectNode {
        &mut self.graph[idx]
    }

    /// Node indices in full-path order
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// `(index, node)` pairs in full-path order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ProjectNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look a node up by its descriptor path, case-insensitively
    pub fn find_by_path(&self, path: &str) -> Option<NodeIndex> {
        self.by_path.get(&path.to_lowercase()).copied()
    }

    /// Add `from` → `to`
    ///
    /// Self-loops and repeated edges are dropped; returns whether an edge
    /// was added.
    pub fn add_dependency(&mut self, from: NodeIndex, to: NodeIndex, kind: DependencyKind) -> bool {
        if from == to || self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, kind);
        true
    }

    pub fn depends_on(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.find_edge(from, to).is_some()
    }

    pub fn edge_kind(&self, from: NodeIndex, to: NodeIndex) -> Option<DependencyKind> {
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge])
    }

    /// Direct dependencies in the order they were added
    pub fn dependencies(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks outgoing edges newest first
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        deps.reverse();
        deps
    }

    /// Number of nodes depending directly on `idx`
    pub fn used_by_count(&self, idx: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .count()
    }

    /// Every edge, grouped by source in arena order
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.indices()
            .flat_map(|from| {
                self.dependencies(from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Strongly connected components with more than one node
    ///
    /// Each component is sorted by arena index; components are ordered by
    /// their first member.
    pub fn cycles(&self) -> Vec<Vec<NodeIndex>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cycles.sort();
        cycles
    }
}
