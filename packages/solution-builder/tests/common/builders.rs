//! Test data builders

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use solution_builder::config::{ManifestConfig, ParallelConfig};
use solution_builder::features::evaluation::{snapshot_path, SnapshotEvaluator};
use solution_builder::{SolutionBuilder, SolutionConfig};

/// Builder for one descriptor snapshot
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    properties: BTreeMap<String, String>,
    items: BTreeMap<String, Vec<Value>>,
    definitions: BTreeMap<String, Map<String, Value>>,
}

impl DescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    /// Add an item with no metadata
    pub fn item(self, item_type: &str, include: &str) -> Self {
        self.item_with(item_type, include, &[])
    }

    pub fn item_with(mut self, item_type: &str, include: &str, metadata: &[(&str, &str)]) -> Self {
        let metadata: Map<String, Value> = metadata
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        self.items
            .entry(item_type.to_string())
            .or_default()
            .push(json!({ "include": include, "metadata": metadata }));
        self
    }

    /// Item-definition metadata set by the descriptor itself
    pub fn definition(mut self, item_type: &str, name: &str, value: &str) -> Self {
        self.definitions
            .entry(item_type.to_string())
            .or_default()
            .insert(name.to_string(), json!({ "value": value, "imported": false }));
        self
    }

    /// Item-definition metadata inherited from an imported sheet
    pub fn imported_definition(mut self, item_type: &str, name: &str, value: &str) -> Self {
        self.definitions
            .entry(item_type.to_string())
            .or_default()
            .insert(name.to_string(), json!({ "value": value, "imported": true }));
        self
    }

    pub fn to_json(&self) -> String {
        let definitions: Map<String, Value> = self
            .definitions
            .iter()
            .map(|(k, v)| (k.clone(), json!({ "metadata": v })))
            .collect();
        let snapshot = json!({
            "properties": self.properties,
            "items": self.items,
            "item_definitions": definitions,
        });
        serde_json::to_string_pretty(&snapshot).unwrap()
    }
}

/// A temporary source tree
pub struct TreeBuilder {
    dir: TempDir,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a plain file, creating its directory
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a descriptor and its snapshot sidecar
    pub fn descriptor(&self, relative: &str, descriptor: DescriptorBuilder) -> PathBuf {
        let path = self.file(relative, "<Project />");
        std::fs::write(snapshot_path(&path), descriptor.to_json()).unwrap();
        path
    }

    /// Write a descriptor with no sidecar, which the evaluator rejects
    pub fn broken_descriptor(&self, relative: &str) -> PathBuf {
        self.file(relative, "<Project")
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Parsed snapshot of a descriptor
    pub fn snapshot(&self, relative: &str) -> Value {
        let raw = std::fs::read_to_string(snapshot_path(&self.path(relative))).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

/// Builder for a run configuration
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SolutionConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SolutionConfig::new("Release", "x64"),
        }
    }

    pub fn sequential(mut self) -> Self {
        self.config.parallel = ParallelConfig::sequential();
        self
    }

    pub fn workers(mut self, n: usize) -> Self {
        self.config.parallel.enabled = true;
        self.config.parallel.num_workers = n;
        self
    }

    pub fn manifest(mut self, path: PathBuf, items_name: &str) -> Self {
        self.config.manifest = Some(ManifestConfig {
            path,
            items_name: items_name.to_string(),
        });
        self
    }

    pub fn project_references(mut self) -> Self {
        self.config.output.use_project_references = true;
        self
    }

    pub fn debug_manifests(mut self) -> Self {
        self.config.output.write_debug_manifests = true;
        self
    }

    pub fn build(self) -> SolutionConfig {
        self.config
    }

    pub fn builder(self) -> SolutionBuilder {
        SolutionBuilder::new(self.config, Arc::new(SnapshotEvaluator::new()))
    }
}
