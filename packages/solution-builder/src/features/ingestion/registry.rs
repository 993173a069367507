//! Identity registry
//!
//! Shared by every ingestion worker. One lock covers the path and output
//! indexes together, so a node is either fully registered or not at all.
//!
//! Collisions are decided by descriptor path rather than arrival order: for a
//! contested output the smaller path keeps it. Project IDs are settled only
//! once every output contest is over, walking the retained nodes in path
//! order, so a node that later loses its output never costs another node its
//! ID. Parallel and sequential runs therefore retain the same nodes and IDs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{error, warn};
use uuid::Uuid;

use super::corrections::PendingWrite;
use crate::shared::models::{Duplicate, ProjectNode};

/// What happened to a registered node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Retained for now; a later node with a smaller path may still take its output
    Accepted,

    /// Rejected: another node with a smaller path produces the same output
    DuplicateOutput { output_path: String },

    /// Rejected: the descriptor was already registered
    DuplicatePath,
}

impl Registration {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Registration::Accepted)
    }
}

/// Final registry contents
#[derive(Debug, Default)]
pub struct RegistryContents {
    /// Retained nodes, sorted by full path, with unique project IDs
    pub nodes: Vec<ProjectNode>,
    pub duplicates: Vec<Duplicate>,

    /// One ID rewrite per retained node that was renumbered
    pub pending: Vec<PendingWrite>,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// path key → node
    nodes: HashMap<String, ProjectNode>,
    /// output key → path key
    outputs: HashMap<String, String>,
    /// output key → contest record
    duplicates: BTreeMap<String, Duplicate>,
}

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    state: Mutex<RegistryState>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-if-absent over path and output at once
    pub fn register(&self, node: ProjectNode) -> Registration {
        let mut state = self.state.lock();
        state.register(node)
    }

    pub fn len(&self) -> usize {
        self.state.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Settle project IDs over the retained nodes and hand everything back
    pub fn into_contents(self) -> RegistryContents {
        let state = self.state.into_inner();

        let mut nodes: Vec<ProjectNode> = state.nodes.into_values().collect();
        nodes.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        let pending = assign_ids(&mut nodes);

        RegistryContents {
            nodes,
            duplicates: state.duplicates.into_values().collect(),
            pending,
        }
    }
}

/// The first node in path order keeps a contested ID; later ones and nodes
/// without an ID get a fresh one.
fn assign_ids(nodes: &mut [ProjectNode]) -> Vec<PendingWrite> {
    let declared: HashSet<String> = nodes.iter().map(|n| id_key(&n.project_id)).collect();
    let mut claimed: HashSet<String> = HashSet::with_capacity(nodes.len());
    let mut pending = Vec::new();

    for node in nodes.iter_mut() {
        let key = id_key(&node.project_id);
        if !key.is_empty() && claimed.insert(key) {
            continue;
        }

        let replacement = fresh_id(&declared, &claimed);
        warn!(
            project = %node.full_path.display(),
            previous = %node.project_id,
            replacement = %replacement,
            "Duplicate or missing project ID, assigned a new one"
        );
        claimed.insert(replacement.clone());
        let previous = std::mem::replace(&mut node.project_id, replacement.clone());
        pending.push(PendingWrite::ProjectId {
            path: node.full_path.clone(),
            previous,
            replacement,
        });
    }
    pending
}

fn id_key(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Fresh `{XXXXXXXX-...}` no retained node declares or holds
fn fresh_id(declared: &HashSet<String>, claimed: &HashSet<String>) -> String {
    loop {
        let candidate = format!("{{{}}}", Uuid::new_v4()).to_uppercase();
        if !declared.contains(&candidate) && !claimed.contains(&candidate) {
            return candidate;
        }
    }
}

impl RegistryState {
    fn register(&mut self, node: ProjectNode) -> Registration {
        let path_key = node.path_key();
        if self.nodes.contains_key(&path_key) {
            warn!(project = %node.full_path.display(), "Descriptor registered twice, ignored");
            return Registration::DuplicatePath;
        }

        let output_key = node.output_key();
        if let Some(incumbent_key) = self.outputs.get(&output_key).cloned() {
            let incumbent_path = self.nodes[&incumbent_key].full_path.clone();
            if incumbent_path <= node.full_path {
                self.record_duplicate(&output_key, &node.output_path, incumbent_path, node.full_path.clone());
                return Registration::DuplicateOutput {
                    output_path: node.output_path,
                };
            }
            // The newcomer sorts first and takes the output over.
            if let Some(displaced) = self.evict(&incumbent_key) {
                self.record_duplicate(&output_key, &node.output_path, node.full_path.clone(), displaced.full_path);
            }
        }

        self.outputs.insert(output_key, path_key.clone());
        self.nodes.insert(path_key, node);
        Registration::Accepted
    }

    /// Drop a retained node and every index pointing at it
    fn evict(&mut self, path_key: &str) -> Option<ProjectNode> {
        let node = self.nodes.remove(path_key)?;
        self.outputs.retain(|_, owner| owner != path_key);
        Some(node)
    }

    fn record_duplicate(&mut self, output_key: &str, output_path: &str, kept: PathBuf, rejected: PathBuf) {
        error!(
            output = %output_path,
            kept = %kept.display(),
            rejected = %rejected.display(),
            "Duplicate output path, project excluded"
        );
        let duplicate = self
            .duplicates
            .entry(output_key.to_string())
            .or_insert_with(|| Duplicate::new(output_path.to_string(), kept.clone()));

        if duplicate.claimants[0] != kept {
            duplicate.claimants.retain(|p| p != &kept);
            duplicate.claimants.insert(0, kept);
        }
        if !duplicate.claimants.contains(&rejected) {
            duplicate.claimants.push(rejected);
        }
        duplicate.claimants[1..].sort();
    }
}
