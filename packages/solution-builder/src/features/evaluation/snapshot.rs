//! Snapshot evaluator
//!
//! Reads the evaluated view of a descriptor from a JSON sidecar
//! (`core.vcxproj` → `core.vcxproj.eval.json`) written by an external
//! evaluation step, and writes mutations back to the same sidecar.
//!
//! ```json
//! {
//!   "properties": { "ProjectGuid": "{...}", "TargetName": "Core" },
//!   "items": { "ClCompile": [ { "include": "a.cpp" } ] },
//!   "item_definitions": {
//!     "Midl": { "metadata": { "TypeLibraryName": { "value": "core.tlb", "imported": true } } },
//!     "Link": { "metadata": { "AdditionalDependencies": "base.lib;%(AdditionalDependencies)" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::descriptor::{DescriptorItem, EvaluatedDescriptor, ItemDefinition, MetadataValue};
use super::ports::ProjectEvaluator;
use crate::errors::{Result, SolutionError};

/// Sidecar suffix appended to the descriptor file name
pub const SNAPSHOT_SUFFIX: &str = ".eval.json";

/// Sidecar location for a descriptor
pub fn snapshot_path(descriptor: &Path) -> PathBuf {
    let mut name: OsString = descriptor.as_os_str().to_owned();
    name.push(SNAPSHOT_SUFFIX);
    PathBuf::from(name)
}

/// On-disk snapshot layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSnapshot {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    #[serde(default)]
    pub items: BTreeMap<String, Vec<DescriptorItem>>,

    #[serde(default)]
    pub item_definitions: BTreeMap<String, SnapshotDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDefinition {
    #[serde(default)]
    pub metadata: BTreeMap<String, SnapshotMetadata>,
}

/// Either a bare string (local value) or `{ value, imported }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotMetadata {
    Plain(String),
    Detailed {
        value: String,
        #[serde(default)]
        imported: bool,
    },
}

impl From<SnapshotMetadata> for MetadataValue {
    fn from(raw: SnapshotMetadata) -> Self {
        match raw {
            SnapshotMetadata::Plain(value) => MetadataValue::local(value),
            SnapshotMetadata::Detailed { value, imported } => MetadataValue { value, imported },
        }
    }
}

impl From<&MetadataValue> for SnapshotMetadata {
    fn from(value: &MetadataValue) -> Self {
        if value.imported {
            SnapshotMetadata::Detailed {
                value: value.value.clone(),
                imported: true,
            }
        } else {
            SnapshotMetadata::Plain(value.value.clone())
        }
    }
}

impl DescriptorSnapshot {
    pub fn into_descriptor(
        self,
        path: PathBuf,
        globals: BTreeMap<String, String>,
    ) -> EvaluatedDescriptor {
        let item_definitions = self
            .item_definitions
            .into_iter()
            .map(|(item_type, definition)| {
                let metadata = definition
                    .metadata
                    .into_iter()
                    .map(|(name, raw)| (name, MetadataValue::from(raw)))
                    .collect();
                (item_type, ItemDefinition { metadata })
            })
            .collect();

        EvaluatedDescriptor::from_parts(path, globals, self.properties, self.items, item_definitions)
    }

    pub fn from_descriptor(descriptor: &EvaluatedDescriptor) -> Self {
        let item_definitions = descriptor
            .item_definitions()
            .iter()
            .map(|(item_type, definition)| {
                let metadata = definition
                    .metadata
                    .iter()
                    .map(|(name, value)| (name.clone(), SnapshotMetadata::from(value)))
                    .collect();
                (item_type.clone(), SnapshotDefinition { metadata })
            })
            .collect();

        Self {
            properties: descriptor.properties().clone(),
            items: descriptor.all_items().clone(),
            item_definitions,
        }
    }
}

/// [`ProjectEvaluator`] backed by JSON sidecars
#[derive(Debug, Default)]
pub struct SnapshotEvaluator {
    write_lock: Mutex<()>,
}

impl SnapshotEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectEvaluator for SnapshotEvaluator {
    fn expand(
        &self,
        path: &Path,
        globals: &BTreeMap<String, String>,
    ) -> Result<EvaluatedDescriptor> {
        let sidecar = snapshot_path(path);
        let content = std::fs::read_to_string(&sidecar).map_err(|e| {
            SolutionError::evaluation(
                path,
                format!("cannot read snapshot {}: {}", sidecar.display(), e),
            )
        })?;
        let snapshot: DescriptorSnapshot = serde_json::from_str(&content)
            .map_err(|e| SolutionError::evaluation(path, format!("malformed snapshot: {}", e)))?;

        debug!(path = %path.display(), "Loaded descriptor snapshot");
        Ok(snapshot.into_descriptor(path.to_path_buf(), globals.clone()))
    }

    fn save(&self, descriptor: &EvaluatedDescriptor) -> Result<()> {
        let snapshot = DescriptorSnapshot::from_descriptor(descriptor);
        let json = serde_json::to_string_pretty(&snapshot)?;
        let sidecar = snapshot_path(descriptor.path());

        let _guard = self.write_lock.lock();
        std::fs::write(&sidecar, json)?;
        debug!(path = %sidecar.display(), "Saved descriptor snapshot");
        Ok(())
    }
}
