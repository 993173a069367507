//! Orphaned source files
//!
//! A `*.cs` file under the root that no managed descriptor compiles.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::errors::Result;
use crate::features::evaluation::ProjectEvaluator;
use crate::features::ingestion::{absolute, check_search_root, discover_projects};
use crate::shared::models::ProjectKind;
use crate::shared::utils::{extension_of, normalize, path_key, to_native};

const COMPILE_ITEM: &str = "Compile";

/// Orphaned `*.cs` files under `root`, sorted by path
pub fn find_orphans(
    root: &Path,
    evaluator: &dyn ProjectEvaluator,
    globals: &BTreeMap<String, String>,
) -> Result<Vec<PathBuf>> {
    let root = absolute(root)?;
    check_search_root(&root)?;

    let mut compiled: HashSet<String> = HashSet::new();
    for project in discover_projects(&root)? {
        if project.kind != ProjectKind::Managed {
            continue;
        }
        let descriptor = match evaluator.expand(&project.path, globals) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                error!(project = %project.path.display(), error = %e, "Malformed descriptor, skipped");
                continue;
            }
        };
        for item in descriptor.items(COMPILE_ITEM) {
            let source = normalize(descriptor.directory(), &to_native(&item.include));
            compiled.insert(path_key(&source));
        }
    }

    let mut orphans = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_string_lossy().starts_with('.')
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Cannot read directory entry, skipped");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !extension_of(&name).is_some_and(|ext| ext.eq_ignore_ascii_case("cs")) {
            continue;
        }
        if !compiled.contains(&path_key(entry.path())) {
            orphans.push(entry.into_path());
        }
    }
    orphans.sort();

    info!(
        root = %root.display(),
        compiled = compiled.len(),
        orphans = orphans.len(),
        "Orphan scan complete"
    );
    Ok(orphans)
}
