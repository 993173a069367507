//! Ports - evaluator interface

use std::collections::BTreeMap;
use std::path::Path;

use super::descriptor::EvaluatedDescriptor;
use crate::errors::Result;

/// Evaluates descriptors and persists mutations back to them
///
/// Implementations are shared across ingestion workers.
pub trait ProjectEvaluator: Send + Sync {
    /// Evaluate `path` with `globals` overriding file-level properties
    fn expand(&self, path: &Path, globals: &BTreeMap<String, String>)
        -> Result<EvaluatedDescriptor>;

    /// Persist property and item mutations to the backing descriptor
    ///
    /// Global properties are never written back.
    fn save(&self, descriptor: &EvaluatedDescriptor) -> Result<()>;
}
