//! Evaluated descriptor model
//!
//! Every name lookup (property, item type, metadata) is case-insensitive,
//! matching how the build engine itself treats them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static MACRO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_.\-]*)\)").expect("Invalid regex"));

/// One item: resolved include plus metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorItem {
    pub include: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DescriptorItem {
    pub fn new(include: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive metadata lookup
    pub fn metadata(&self, name: &str) -> Option<&str> {
        lookup(&self.metadata, name).map(String::as_str)
    }
}

/// Item-definition metadata value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataValue {
    pub value: String,

    /// Inherited from an imported property sheet rather than set by the
    /// descriptor itself
    pub imported: bool,
}

impl MetadataValue {
    pub fn local(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            imported: false,
        }
    }

    pub fn imported(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            imported: true,
        }
    }
}

/// Default metadata applied to every item of one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDefinition {
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl ItemDefinition {
    pub fn get(&self, name: &str) -> Option<&MetadataValue> {
        lookup(&self.metadata, name)
    }

    /// Metadata value, ignoring the `imported` flag
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|m| m.value.as_str())
    }
}

/// Evaluated project handle
///
/// Holds the full property/item view of one descriptor. Mutations stay in
/// memory until [`crate::ProjectEvaluator::save`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluatedDescriptor {
    path: PathBuf,
    globals: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
    items: BTreeMap<String, Vec<DescriptorItem>>,
    item_definitions: BTreeMap<String, ItemDefinition>,
}

impl EvaluatedDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub(crate) fn from_parts(
        path: PathBuf,
        globals: BTreeMap<String, String>,
        properties: BTreeMap<String, String>,
        items: BTreeMap<String, Vec<DescriptorItem>>,
        item_definitions: BTreeMap<String, ItemDefinition>,
    ) -> Self {
        Self {
            path,
            globals,
            properties,
            items,
            item_definitions,
        }
    }

    // ── builders (tests, in-memory evaluators) ────────────────────────────

    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn with_item(mut self, item_type: impl Into<String>, item: DescriptorItem) -> Self {
        self.add_item(item_type, item);
        self
    }

    pub fn with_definition(
        mut self,
        item_type: impl Into<String>,
        name: impl Into<String>,
        value: MetadataValue,
    ) -> Self {
        self.item_definitions
            .entry(item_type.into())
            .or_default()
            .metadata
            .insert(name.into(), value);
        self
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the descriptor
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Property value; global overrides win over file properties
    pub fn property(&self, name: &str) -> Option<&str> {
        lookup(&self.globals, name)
            .or_else(|| lookup(&self.properties, name))
            .map(String::as_str)
    }

    /// Property value, `None` when missing or blank
    pub fn non_empty_property(&self, name: &str) -> Option<&str> {
        self.property(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Items of one type, in declaration order
    pub fn items(&self, item_type: &str) -> &[DescriptorItem] {
        lookup(&self.items, item_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn item_definition(&self, item_type: &str) -> Option<&ItemDefinition> {
        lookup(&self.item_definitions, item_type)
    }

    /// File-level properties (globals excluded)
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn all_items(&self) -> &BTreeMap<String, Vec<DescriptorItem>> {
        &self.items
    }

    pub fn item_definitions(&self) -> &BTreeMap<String, ItemDefinition> {
        &self.item_definitions
    }

    /// Substitute `$(Name)` references; unknown properties expand to ""
    pub fn expand_macros(&self, raw: &str) -> String {
        MACRO_PATTERN
            .replace_all(raw, |caps: &Captures<'_>| {
                self.property(&caps[1]).unwrap_or_default().to_string()
            })
            .into_owned()
    }

    // ── mutation ──────────────────────────────────────────────────────────

    /// Set a file-level property, reusing the existing key's casing
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let key = existing_key(&self.properties, &name).unwrap_or(name);
        self.properties.insert(key, value.into());
    }

    /// Remove items of one type matching `predicate`; returns how many went
    pub fn remove_items<F>(&mut self, item_type: &str, mut predicate: F) -> usize
    where
        F: FnMut(&DescriptorItem) -> bool,
    {
        let Some(key) = existing_key(&self.items, item_type) else {
            return 0;
        };
        let Some(items) = self.items.get_mut(&key) else {
            return 0;
        };
        let before = items.len();
        items.retain(|item| !predicate(item));
        let removed = before - items.len();
        if items.is_empty() {
            self.items.remove(&key);
        }
        removed
    }

    pub fn add_item(&mut self, item_type: impl Into<String>, item: DescriptorItem) {
        let item_type = item_type.into();
        let key = existing_key(&self.items, &item_type).unwrap_or(item_type);
        self.items.entry(key).or_default().push(item);
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn existing_key<V>(map: &BTreeMap<String, V>, name: &str) -> Option<String> {
    map.keys().find(|key| key.eq_ignore_ascii_case(name)).cloned()
}
