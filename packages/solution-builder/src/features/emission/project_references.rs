//! Project-reference rewrite planning

use crate::features::dependency_graph::ProjectGraph;
use crate::features::ingestion::{PendingWrite, ProjectReferenceEntry};
use crate::shared::utils::relative_path;

/// One write per discovered node that has dependencies
///
/// Covers ignored nodes too, so a seeded run leaves no descriptor with stale
/// plain references. Entries follow the node's dependency order. Nothing is
/// persisted here.
pub fn project_reference_writes(graph: &ProjectGraph) -> Vec<PendingWrite> {
    graph
        .indices()
        .filter_map(|idx| {
            let node = graph.node(idx);
            let references: Vec<ProjectReferenceEntry> = graph
                .dependencies(idx)
                .into_iter()
                .map(|dep| {
                    let dep = graph.node(dep);
                    ProjectReferenceEntry {
                        include: relative_path(&node.full_path, &dep.full_path),
                        project_id: dep.project_id.clone(),
                        assembly_name: dep.assembly_name.clone(),
                    }
                })
                .collect();

            if references.is_empty() {
                None
            } else {
                Some(PendingWrite::ProjectReferences {
                    path: node.full_path.clone(),
                    references,
                })
            }
        })
        .collect()
}
