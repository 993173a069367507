//! Plain-text debug listings written beside the solution

use std::fmt::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::write_artifact;
use crate::errors::Result;
use crate::features::closure::BuildClosure;
use crate::features::dependency_graph::ProjectGraph;
use crate::shared::models::{ProjectKind, ProjectNode};

pub const BUILD_LIST: &str = "build_list.txt";
pub const PROJECTS_ALL: &str = "projects_all.txt";
pub const PROJECTS_IN_BUILD: &str = "projects_in_build.txt";
pub const PROJECTS_NOT_IN_BUILD: &str = "projects_not_in_build.txt";
pub const PROJECTS_MANAGED_VC: &str = "projects_managed_vc.txt";
pub const PROJECTS_NATIVE_LIBRARIES: &str = "projects_native_libraries.txt";
pub const PROJECTS_PDB_FILES: &str = "projects_PDB_files.txt";

pub const DEBUG_MANIFEST_FILES: &[&str] = &[
    BUILD_LIST,
    PROJECTS_ALL,
    PROJECTS_IN_BUILD,
    PROJECTS_NOT_IN_BUILD,
    PROJECTS_MANAGED_VC,
    PROJECTS_NATIVE_LIBRARIES,
    PROJECTS_PDB_FILES,
];

const COLUMN: usize = 50;

/// Write every listing into `directory`; returns the written paths
pub fn write_debug_manifests(
    directory: &Path,
    graph: &ProjectGraph,
    closure: &BuildClosure,
) -> Result<Vec<PathBuf>> {
    let listings = [
        (BUILD_LIST, build_list(graph, closure)),
        (PROJECTS_ALL, projects_all(graph)),
        (
            PROJECTS_IN_BUILD,
            listing(closure.in_build.iter().map(|&idx| graph.node(idx))),
        ),
        (
            PROJECTS_NOT_IN_BUILD,
            listing(closure.ignored.iter().map(|&idx| graph.node(idx))),
        ),
        (
            PROJECTS_MANAGED_VC,
            listing(
                graph
                    .nodes()
                    .map(|(_, n)| n)
                    .filter(|n| n.kind == ProjectKind::Native && n.is_managed),
            ),
        ),
        (
            PROJECTS_NATIVE_LIBRARIES,
            listing(
                graph
                    .nodes()
                    .map(|(_, n)| n)
                    .filter(|n| n.kind == ProjectKind::Native && n.is_static_library()),
            ),
        ),
        (PROJECTS_PDB_FILES, pdb_files(graph)),
    ];

    let mut written = Vec::with_capacity(listings.len());
    for (name, contents) in listings {
        let path = directory.join(name);
        write_artifact(&path, &contents)?;
        written.push(path);
    }
    info!(directory = %directory.display(), files = written.len(), "Debug manifests written");
    Ok(written)
}

/// Output paths of in-build nodes, static libraries excluded
fn build_list(graph: &ProjectGraph, closure: &BuildClosure) -> String {
    let mut out = String::new();
    for &idx in &closure.in_build {
        let node = graph.node(idx);
        if node.output_name.is_empty() || node.is_static_library() {
            continue;
        }
        let _ = writeln!(out, "{}", node.output_path);
    }
    out
}

/// Every node with its direct dependencies
fn projects_all(graph: &ProjectGraph) -> String {
    let mut out = String::new();
    for (idx, node) in graph.nodes() {
        let _ = writeln!(out, "{:>w$}\t{}", node.output_name, node.full_path.display(), w = COLUMN);
        let deps = graph.dependencies(idx);
        if !deps.is_empty() {
            let _ = writeln!(out, "{:w$}Depends on", "", w = COLUMN);
            for dep in deps {
                let _ = writeln!(out, "{:w$}{}", "", graph.node(dep).output_name, w = COLUMN);
            }
        }
    }
    out
}

fn listing<'a>(nodes: impl Iterator<Item = &'a ProjectNode>) -> String {
    let mut out = String::new();
    for node in nodes {
        let _ = writeln!(out, "{:>w$} - {}", node.output_name, node.full_path.display(), w = COLUMN);
    }
    out
}

fn pdb_files(graph: &ProjectGraph) -> String {
    let mut out = String::new();
    for (_, node) in graph.nodes() {
        if let Some(pdb) = node.pdb_name.as_deref().filter(|p| !p.is_empty()) {
            let _ = writeln!(out, "{}", pdb);
        }
    }
    out
}
