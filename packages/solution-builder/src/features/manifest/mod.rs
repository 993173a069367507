//! Build manifest
//!
//! The manifest is a descriptor like any other, read through the same
//! evaluator. One item type lists the official entry points; items of type
//! `ExtraDependencies` carry a `DependsOn` path and become explicit edges.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::errors::{Result, SolutionError};
use crate::features::evaluation::ProjectEvaluator;
use crate::shared::models::ExtraDependencyDirective;
use crate::shared::utils::{normalize, path_key, to_native};

pub const EXTRA_DEPENDENCIES_ITEM: &str = "ExtraDependencies";
pub const DEPENDS_ON_METADATA: &str = "DependsOn";

/// Seeds and directives read from a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildManifest {
    /// Lowercase, normalized, existing, deduplicated; declaration order
    pub seeds: Vec<PathBuf>,
    pub directives: Vec<ExtraDependencyDirective>,

    /// Entry-point items dropped because their file is missing
    pub rejected_seeds: usize,
}

impl BuildManifest {
    /// Evaluate the manifest at `path`
    ///
    /// A missing or unevaluable manifest fails the run. Individual entries
    /// naming missing files are reported and dropped.
    pub fn load(
        evaluator: &dyn ProjectEvaluator,
        path: &Path,
        items_name: &str,
        globals: &BTreeMap<String, String>,
    ) -> Result<Self> {
        if !path.is_file() {
            return Err(SolutionError::Manifest {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }
        let descriptor = evaluator
            .expand(path, globals)
            .map_err(|e| SolutionError::Manifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let base = descriptor.directory().to_path_buf();

        let mut manifest = BuildManifest::default();
        let mut seen = HashSet::new();
        for item in descriptor.items(items_name) {
            let resolved = resolve(&base, &item.include);
            if !resolved.is_file() {
                error!(
                    manifest = %path.display(),
                    entry = %item.include,
                    "Build list entry does not exist, skipped"
                );
                manifest.rejected_seeds += 1;
                continue;
            }
            let key = path_key(&resolved);
            if seen.insert(key.clone()) {
                manifest.seeds.push(PathBuf::from(key));
            }
        }

        for item in descriptor.items(EXTRA_DEPENDENCIES_ITEM) {
            let Some(depends_on) = item.metadata(DEPENDS_ON_METADATA) else {
                error!(
                    manifest = %path.display(),
                    entry = %item.include,
                    "ExtraDependencies item has no DependsOn, skipped"
                );
                continue;
            };
            manifest.directives.push(ExtraDependencyDirective::new(
                resolve(&base, &item.include),
                resolve(&base, depends_on),
            ));
        }

        info!(
            manifest = %path.display(),
            seeds = manifest.seeds.len(),
            rejected = manifest.rejected_seeds,
            directives = manifest.directives.len(),
            "Build manifest loaded"
        );
        Ok(manifest)
    }
}

fn resolve(base: &Path, raw: &str) -> PathBuf {
    normalize(base, &to_native(raw.trim()))
}
