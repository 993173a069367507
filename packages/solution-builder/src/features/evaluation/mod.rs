//! Project evaluation
//!
//! Turning a descriptor's XML (conditions, imported property sheets, macro
//! expansion) into properties and items is an external concern. This slice
//! only defines the port the engine talks to and one adapter reading
//! pre-evaluated snapshots.

mod descriptor;
mod ports;
mod snapshot;

pub use descriptor::{DescriptorItem, EvaluatedDescriptor, ItemDefinition, MetadataValue};
pub use ports::ProjectEvaluator;
pub use snapshot::{snapshot_path, DescriptorSnapshot, SnapshotEvaluator, SNAPSHOT_SUFFIX};
