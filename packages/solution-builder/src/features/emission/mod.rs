//! Output emission
//!
//! Everything here reads the graph and closure only. The one side effect on
//! descriptors (project-reference rewrite) is returned as pending writes.

mod dgml;
mod manifests;
mod project_references;
mod solution;
mod solution_parser;

pub use dgml::{render_dgml, DGML_NAMESPACE};
pub use manifests::{write_debug_manifests, DEBUG_MANIFEST_FILES};
pub use project_references::project_reference_writes;
pub use solution::{render_solution, SolutionOptions, SOLUTION_HEADER};
pub use solution_parser::{parse_solution, read_solution, ParsedSolution, SolutionProject};

use std::path::Path;

use crate::errors::Result;

/// Write an artifact, creating its directory if needed
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}
