//! ProjectNode construction from an evaluated descriptor
//!
//! Managed descriptors contribute identity, output and `Reference` items.
//! Native descriptors additionally contribute link inputs, import and type
//! libraries, and whatever source scanning recovers.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::features::evaluation::{DescriptorItem, EvaluatedDescriptor};
use crate::features::source_scan::scan_sources;
use crate::shared::models::{NativeOutputs, ProjectKind, ProjectNode};
use crate::shared::utils::{extension_of, file_name_of, file_stem_of, normalize, to_native};

pub const PROP_PROJECT_GUID: &str = "ProjectGuid";
pub const PROP_ASSEMBLY_NAME: &str = "AssemblyName";
const PROP_PROJECT_NAME: &str = "ProjectName";
const PROP_TARGET_NAME: &str = "TargetName";
const PROP_TARGET_EXT: &str = "TargetExt";
const PROP_TARGET_PATH: &str = "TargetPath";
const PROP_OUTPUT_PATH: &str = "OutputPath";
const PROP_OUT_DIR: &str = "OutDir";
const PROP_CLR_SUPPORT: &str = "CLRSupport";

const DEFAULT_TARGET_EXT: &str = ".dll";

/// Build a node for `descriptor`
///
/// Native nodes scan their `ClCompile`/`ClInclude` sources here, so this is
/// the expensive part of ingestion.
pub fn build_project_node(descriptor: &EvaluatedDescriptor, kind: ProjectKind) -> ProjectNode {
    let mut node = ProjectNode::new(descriptor.path().to_path_buf(), kind);
    let stem = descriptor
        .path()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    node.project_id = descriptor
        .non_empty_property(PROP_PROJECT_GUID)
        .unwrap_or_default()
        .to_string();
    node.name = descriptor
        .non_empty_property(PROP_PROJECT_NAME)
        .unwrap_or(stem.as_str())
        .to_string();

    match kind {
        ProjectKind::Managed => fill_managed(&mut node, descriptor, &stem),
        ProjectKind::Native => fill_native(&mut node, descriptor, &stem),
    }

    debug!(
        project = %node.full_path.display(),
        output = %node.output_name,
        managed = node.is_managed,
        references = node.reference_assemblies.len(),
        "Built project node"
    );
    node
}

fn fill_managed(node: &mut ProjectNode, descriptor: &EvaluatedDescriptor, stem: &str) {
    let assembly = descriptor
        .non_empty_property(PROP_ASSEMBLY_NAME)
        .unwrap_or(stem)
        .to_string();
    let ext = target_extension(descriptor);

    node.output_name = format!("{}{}", assembly, ext).to_lowercase();
    let output_dir = descriptor
        .non_empty_property(PROP_OUTPUT_PATH)
        .map(|dir| resolve(descriptor.directory(), dir))
        .unwrap_or_else(|| descriptor.directory().to_path_buf());
    node.output_path = output_dir
        .join(&node.output_name)
        .to_string_lossy()
        .into_owned();
    node.pdb_name = Some(format!("{}.pdb", assembly).to_lowercase());
    node.assembly_name = assembly;
    node.is_managed = true;

    for name in reference_assemblies(descriptor.items("Reference")) {
        node.add_reference_assembly(name);
    }
}

fn fill_native(node: &mut ProjectNode, descriptor: &EvaluatedDescriptor, stem: &str) {
    let target_name = descriptor
        .non_empty_property(PROP_TARGET_NAME)
        .unwrap_or(stem)
        .to_string();
    let ext = target_extension(descriptor);
    let is_lib = ext.eq_ignore_ascii_case(".lib");

    node.output_name = format!("{}{}", target_name, ext).to_lowercase();
    node.output_path = match descriptor.non_empty_property(PROP_TARGET_PATH) {
        Some(path) => resolve(descriptor.directory(), path),
        None => descriptor
            .non_empty_property(PROP_OUT_DIR)
            .map(|dir| resolve(descriptor.directory(), dir))
            .unwrap_or_else(|| descriptor.directory().to_path_buf())
            .join(format!("{}{}", target_name, ext)),
    }
    .to_string_lossy()
    .into_owned();

    let mut outputs = NativeOutputs::default();
    let mut pdb_name = format!("{}.pdb", target_name).to_lowercase();

    let link_def = descriptor.item_definition(if is_lib { "Lib" } else { "Link" });
    if let Some(link) = link_def {
        if let Some(import) = link.value("ImportLibrary").map(str::trim) {
            let import = descriptor.expand_macros(import);
            if !import.is_empty() {
                outputs.import_library_path = Some(import.to_lowercase());
                outputs.import_library = Some(file_name_of(&import).to_lowercase());
            }
        }
        if let Some(deps) = link.value("AdditionalDependencies") {
            outputs.input_libraries = input_libraries(descriptor, deps);
        }
        if let Some(pdb) = link.value("ProgramDatabaseFile") {
            let pdb = descriptor.expand_macros(pdb);
            let name = file_name_of(pdb.trim());
            if !name.is_empty() {
                pdb_name = name.to_lowercase();
            }
        }
    }
    if is_lib {
        outputs.import_library = Some(node.output_name.clone());
    } else if outputs.import_library.is_none() && ext.eq_ignore_ascii_case(DEFAULT_TARGET_EXT) {
        outputs.import_library = Some(format!("{}.lib", target_name).to_lowercase());
    }

    outputs.type_library = produced_type_library(descriptor);

    node.pdb_name = Some(pdb_name);
    node.assembly_name = descriptor
        .non_empty_property(PROP_ASSEMBLY_NAME)
        .unwrap_or(target_name.as_str())
        .to_string();

    // All three signals are evaluated; the references feed edge discovery.
    let references = reference_assemblies(descriptor.items("Reference"));
    let has_references = !references.is_empty();
    let clr_enabled = !descriptor
        .property(PROP_CLR_SUPPORT)
        .map(|v| v.trim().eq_ignore_ascii_case("false"))
        .unwrap_or(false);
    let compiles_managed = descriptor.items("ClCompile").iter().any(|item| {
        item.metadata("CompileAsManaged")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    });
    node.is_managed = has_references || clr_enabled || compiles_managed;
    for name in references {
        node.add_reference_assembly(name);
    }

    let sources = source_files(descriptor);
    let scan = scan_sources(&sources, node.is_managed);
    for name in scan.type_libraries {
        outputs.add_input_type_library(name);
    }
    for name in scan.using_assemblies {
        node.add_reference_assembly(name);
    }

    node.native = Some(outputs);
}

/// `TargetExt` with a leading dot, `.dll` when unset
fn target_extension(descriptor: &EvaluatedDescriptor) -> String {
    match descriptor.non_empty_property(PROP_TARGET_EXT) {
        Some(ext) if ext.starts_with('.') => ext.to_string(),
        Some(ext) => format!(".{}", ext),
        None => DEFAULT_TARGET_EXT.to_string(),
    }
}

fn resolve(base: &Path, raw: &str) -> PathBuf {
    normalize(base, &to_native(raw))
}

/// Lowercase assembly names from `Reference` items
///
/// A `HintPath` with an extension names the file; otherwise the first
/// comma-separated segment of the include is the bare assembly name.
pub fn reference_assemblies(items: &[DescriptorItem]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in items {
        let hint = item
            .metadata("HintPath")
            .map(str::trim)
            .filter(|hint| extension_of(hint).is_some());

        let name = match hint {
            Some(hint) => file_name_of(hint).trim().to_lowercase(),
            None => item
                .include
                .split(',')
                .map(str::trim)
                .find(|segment| !segment.is_empty())
                .unwrap_or_default()
                .to_lowercase(),
        };
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Library file names from an `AdditionalDependencies` list
///
/// `%(...)` entries are inherited placeholders and are skipped.
fn input_libraries(descriptor: &EvaluatedDescriptor, raw: &str) -> Vec<String> {
    let mut libraries: Vec<String> = Vec::new();
    for entry in raw.split(';').map(str::trim) {
        if entry.is_empty() || entry.starts_with('%') {
            continue;
        }
        let expanded = descriptor.expand_macros(entry);
        let name = file_name_of(expanded.trim()).to_lowercase();
        if !name.is_empty() && !libraries.contains(&name) {
            libraries.push(name);
        }
    }
    libraries
}

/// Type library file name, only when the descriptor sets it itself and
/// compiles an interface definition
fn produced_type_library(descriptor: &EvaluatedDescriptor) -> Option<String> {
    let declared = descriptor
        .item_definition("Midl")?
        .get("TypeLibraryName")
        .filter(|meta| !meta.imported)?;

    let compiles_idl = !descriptor.items("Midl").is_empty()
        || descriptor
            .items("CustomBuild")
            .iter()
            .any(|item| item.include.to_lowercase().contains(".idl"));
    if !compiles_idl {
        return None;
    }

    let expanded = descriptor.expand_macros(&declared.value);
    let name = file_name_of(expanded.trim()).to_lowercase();
    if file_stem_of(&name).is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Existing `ClCompile` and `ClInclude` files, absolute
fn source_files(descriptor: &EvaluatedDescriptor) -> Vec<PathBuf> {
    descriptor
        .items("ClCompile")
        .iter()
        .chain(descriptor.items("ClInclude"))
        .map(|item| resolve(descriptor.directory(), item.include.trim()))
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                debug!(file = %path.display(), "Source item not on disk, not scanned");
            }
            exists
        })
        .collect()
}
