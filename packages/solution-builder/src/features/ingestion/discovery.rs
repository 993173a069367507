//! Descriptor discovery

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::errors::{Result, SolutionError};
use crate::shared::models::ProjectKind;
use crate::shared::utils::normalize;

/// A descriptor found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProject {
    pub path: PathBuf,
    pub kind: ProjectKind,
}

/// Absolute, normalized form of `path` against the working directory
pub fn absolute(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(normalize(&cwd, path))
}

/// Fail unless `root` is a readable directory
pub fn check_search_root(root: &Path) -> Result<()> {
    std::fs::read_dir(root)
        .map(|_| ())
        .map_err(|e| SolutionError::SearchRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Every managed and native descriptor under `root`, sorted by path
///
/// Hidden directories (`.git`, `.vs`) are not entered. Entries that cannot
/// be read below the root are reported and skipped.
pub fn discover_projects(root: &Path) -> Result<Vec<DiscoveredProject>> {
    let root = absolute(root)?;
    check_search_root(&root)?;

    let mut projects = Vec::new();
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
        if let Some(kind) = ProjectKind::from_path(entry.path()) {
            projects.push(DiscoveredProject {
                path: normalize(&root, entry.path()),
                kind,
            });
        }
    }

    projects.sort_by(|a, b| a.path.cmp(&b.path));
    info!(
        root = %root.display(),
        projects = projects.len(),
        "Discovered project descriptors"
    );
    Ok(projects)
}
