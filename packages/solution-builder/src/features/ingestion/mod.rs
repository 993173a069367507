//! Ingestion: discovered descriptors → registered ProjectNodes

mod corrections;
mod discovery;
mod ingest;
mod model_builder;
mod registry;

pub use corrections::{
    apply_corrections, assembly_of_include, CorrectionReport, PendingWrite, ProjectReferenceEntry,
};
pub use discovery::{absolute, check_search_root, discover_projects, DiscoveredProject};
pub use ingest::{ingest_projects, IngestOutcome, IngestStats};
pub use model_builder::{build_project_node, reference_assemblies};
pub use registry::{IdentityRegistry, Registration, RegistryContents};
