//! Descriptor write-back
//!
//! Analysis never touches descriptors. It records [`PendingWrite`]s, and
//! [`apply_corrections`] replays them through the evaluator once every
//! artifact has been written.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{error, info, warn};

use super::model_builder::PROP_PROJECT_GUID;
use crate::errors::Result;
use crate::features::evaluation::{DescriptorItem, EvaluatedDescriptor, ProjectEvaluator};

/// One `ProjectReference` item to add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReferenceEntry {
    /// Path of the referenced descriptor relative to the referencing one
    pub include: String,
    pub project_id: String,
    pub assembly_name: String,
}

/// A mutation to persist into one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    /// Replace a colliding project ID
    ProjectId {
        path: PathBuf,
        previous: String,
        replacement: String,
    },

    /// Swap plain `Reference` items for `ProjectReference` items
    ProjectReferences {
        path: PathBuf,
        references: Vec<ProjectReferenceEntry>,
    },
}

impl PendingWrite {
    pub fn path(&self) -> &PathBuf {
        match self {
            PendingWrite::ProjectId { path, .. } => path,
            PendingWrite::ProjectReferences { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PendingWrite::ProjectId { .. } => "project-id",
            PendingWrite::ProjectReferences { .. } => "project-references",
        }
    }

    fn apply(&self, descriptor: &mut EvaluatedDescriptor) {
        match self {
            PendingWrite::ProjectId { replacement, .. } => {
                descriptor.set_property(PROP_PROJECT_GUID, replacement.clone());
            }
            PendingWrite::ProjectReferences { references, .. } => {
                descriptor.remove_items("Reference", |item| {
                    let assembly = assembly_of_include(&item.include);
                    references
                        .iter()
                        .any(|r| r.assembly_name.eq_ignore_ascii_case(assembly))
                });
                for reference in references {
                    descriptor.add_item(
                        "ProjectReference",
                        DescriptorItem::new(reference.include.clone())
                            .with_metadata("Project", reference.project_id.clone())
                            .with_metadata("Name", reference.assembly_name.clone()),
                    );
                }
            }
        }
    }
}

/// Bare assembly name of a `Reference` include (`Core, Version=...` → `Core`)
pub fn assembly_of_include(include: &str) -> &str {
    include.split(',').next().unwrap_or_default().trim()
}

/// Outcome of [`apply_corrections`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    pub applied: usize,
    pub failed: usize,
}

/// Persist every pending write
///
/// Each descriptor is re-evaluated, mutated and saved. A failure is reported
/// for that descriptor only.
pub fn apply_corrections(
    evaluator: &dyn ProjectEvaluator,
    globals: &BTreeMap<String, String>,
    writes: &[PendingWrite],
) -> CorrectionReport {
    let mut report = CorrectionReport::default();

    for write in writes {
        match apply_one(evaluator, globals, write) {
            Ok(()) => {
                report.applied += 1;
                if let PendingWrite::ProjectId {
                    path,
                    previous,
                    replacement,
                } = write
                {
                    warn!(
                        project = %path.display(),
                        previous = %previous,
                        replacement = %replacement,
                        "Persisted replacement project ID"
                    );
                }
            }
            Err(e) => {
                report.failed += 1;
                error!(
                    project = %write.path().display(),
                    kind = write.kind(),
                    error = %e,
                    "Cannot persist descriptor correction"
                );
            }
        }
    }

    if !writes.is_empty() {
        info!(
            applied = report.applied,
            failed = report.failed,
            "Descriptor corrections applied"
        );
    }
    report
}

fn apply_one(
    evaluator: &dyn ProjectEvaluator,
    globals: &BTreeMap<String, String>,
    write: &PendingWrite,
) -> Result<()> {
    let mut descriptor = evaluator.expand(write.path(), globals)?;
    write.apply(&mut descriptor);
    evaluator.save(&descriptor)
}
