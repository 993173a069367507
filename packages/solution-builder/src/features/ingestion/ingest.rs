//! Parallel descriptor ingestion
//!
//! One task per descriptor: evaluate, build the node (including its source
//! scan), register it. Runs on whatever rayon pool is current, so the
//! pipeline's pool size decides the degree of parallelism.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{error, info};

use super::discovery::DiscoveredProject;
use super::model_builder::build_project_node;
use super::registry::{IdentityRegistry, RegistryContents};
use crate::features::evaluation::ProjectEvaluator;
use crate::shared::models::ProjectKind;

/// Ingestion counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub discovered: usize,
    pub valid: usize,
    pub bad: usize,
    pub managed_descriptors: usize,
    pub native_descriptors: usize,
    pub repaired_ids: usize,
    pub duplicate_outputs: usize,
}

/// Registry contents plus counters
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub contents: RegistryContents,
    pub stats: IngestStats,
}

/// Evaluate and register every discovered descriptor
///
/// A descriptor the evaluator rejects is reported and skipped; it never
/// becomes a node.
pub fn ingest_projects(
    evaluator: &dyn ProjectEvaluator,
    projects: &[DiscoveredProject],
    globals: &BTreeMap<String, String>,
    parallel: bool,
) -> IngestOutcome {
    let start = Instant::now();
    let registry = IdentityRegistry::new();
    let bad = AtomicUsize::new(0);

    let ingest_one = |project: &DiscoveredProject| {
        let descriptor = match evaluator.expand(&project.path, globals) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                error!(project = %project.path.display(), error = %e, "Malformed descriptor, skipped");
                bad.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        let node = build_project_node(&descriptor, project.kind);
        registry.register(node);
    };

    if parallel {
        projects.par_iter().for_each(ingest_one);
    } else {
        projects.iter().for_each(ingest_one);
    }

    let contents = registry.into_contents();
    let stats = IngestStats {
        discovered: projects.len(),
        valid: contents.nodes.len(),
        bad: bad.load(Ordering::Relaxed),
        managed_descriptors: contents
            .nodes
            .iter()
            .filter(|n| n.kind == ProjectKind::Managed)
            .count(),
        native_descriptors: contents
            .nodes
            .iter()
            .filter(|n| n.kind == ProjectKind::Native)
            .count(),
        // Counted on the final contents so arrival order cannot skew them.
        repaired_ids: contents.pending.len(),
        duplicate_outputs: contents.duplicates.iter().map(|d| d.rejected().len()).sum(),
    };

    info!(
        discovered = stats.discovered,
        valid = stats.valid,
        bad = stats.bad,
        managed = stats.managed_descriptors,
        native = stats.native_descriptors,
        repaired_ids = stats.repaired_ids,
        duplicate_outputs = stats.duplicate_outputs,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Ingestion complete"
    );

    IngestOutcome { contents, stats }
}
