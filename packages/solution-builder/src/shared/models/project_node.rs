//! ProjectNode - one build unit derived from a descriptor

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::shared::utils::{extension_of, file_name_of, path_key};

/// Descriptor flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// `.csproj`
    Managed,
    /// `.vcxproj`
    Native,
}

impl ProjectKind {
    /// Classify a descriptor by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "csproj" => Some(Self::Managed),
            "vcxproj" => Some(Self::Native),
            _ => None,
        }
    }

    /// Well-known solution project type GUID
    pub fn type_guid(&self) -> &'static str {
        match self {
            Self::Managed => "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}",
            Self::Native => "{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managed => "managed",
            Self::Native => "native",
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link-time and type-library facts only native descriptors carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NativeOutputs {
    /// Lowercase import library file name (`core.lib`)
    pub import_library: Option<String>,

    /// Lowercase full path of the import library, when declared
    pub import_library_path: Option<String>,

    /// Lowercase library file names from `AdditionalDependencies`
    pub input_libraries: Vec<String>,

    /// Lowercase type library file name, only when an interface definition is compiled
    pub type_library: Option<String>,

    /// Lowercase type library base names recovered by `#import` scanning
    pub input_type_libraries: Vec<String>,
}

impl NativeOutputs {
    pub fn add_input_type_library(&mut self, name: String) {
        if !self.input_type_libraries.contains(&name) {
            self.input_type_libraries.push(name);
        }
    }
}

/// One project in the graph
///
/// Edges live in [`crate::ProjectGraph`]; the node only carries what the
/// discovery strategies match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectNode {
    pub full_path: PathBuf,

    /// GUID-equivalent token, e.g. `{6F3B...}`
    pub project_id: String,

    /// Display name used in the solution
    pub name: String,

    /// `AssemblyName` / `TargetName`, original casing
    pub assembly_name: String,

    /// Lowercase short file name of the primary output
    pub output_name: String,

    /// Full path of the primary output
    pub output_path: String,

    /// Lowercase debug-symbol file name, never a directory
    pub pdb_name: Option<String>,

    pub is_managed: bool,

    /// Lowercase assembly names, insertion-ordered, no duplicates
    pub reference_assemblies: Vec<String>,

    pub kind: ProjectKind,

    /// Present for [`ProjectKind::Native`] only
    pub native: Option<NativeOutputs>,
}

impl ProjectNode {
    pub fn new(full_path: PathBuf, kind: ProjectKind) -> Self {
        Self {
            full_path,
            project_id: String::new(),
            name: String::new(),
            assembly_name: String::new(),
            output_name: String::new(),
            output_path: String::new(),
            pdb_name: None,
            is_managed: kind == ProjectKind::Managed,
            reference_assemblies: Vec::new(),
            kind,
            native: match kind {
                ProjectKind::Native => Some(NativeOutputs::default()),
                ProjectKind::Managed => None,
            },
        }
    }

    /// Case-insensitive identity of the descriptor path
    pub fn path_key(&self) -> String {
        path_key(&self.full_path)
    }

    /// Case-insensitive identity of the output
    pub fn output_key(&self) -> String {
        self.output_path.to_lowercase()
    }

    /// Descriptor file name, e.g. `core.vcxproj`
    pub fn file_name(&self) -> String {
        self.full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Append a reference assembly unless already present
    pub fn add_reference_assembly(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() || self.reference_assemblies.contains(&name) {
            return false;
        }
        self.reference_assemblies.push(name);
        true
    }

    /// Static library outputs are link inputs, not shippable binaries
    pub fn is_static_library(&self) -> bool {
        extension_of(file_name_of(&self.output_name))
            .map(|ext| ext.eq_ignore_ascii_case("lib"))
            .unwrap_or(false)
    }
}
