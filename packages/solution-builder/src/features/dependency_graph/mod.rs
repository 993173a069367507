//! Dependency graph: node arena plus four edge-discovery strategies

mod graph;
mod strategies;

pub use graph::{DependencyKind, ProjectGraph};
pub use strategies::{
    assembly_reference_edges, explicit_edges, link_library_edges, report_cycles,
    type_library_edges, DependencyGraphBuilder, EdgeStats,
};
