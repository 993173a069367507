use std::path::PathBuf;

use serde::Serialize;

/// An output path claimed by more than one descriptor
///
/// `claimants[0]` is the node that was kept; every later claimant was
/// rejected and is absent from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub output_path: String,
    pub claimants: Vec<PathBuf>,
}

impl Duplicate {
    pub fn new(output_path: impl Into<String>, owner: PathBuf) -> Self {
        Self {
            output_path: output_path.into(),
            claimants: vec![owner],
        }
    }

    /// Descriptors that lost the claim
    pub fn rejected(&self) -> &[PathBuf] {
        self.claimants.get(1..).unwrap_or_default()
    }

    pub fn is_contested(&self) -> bool {
        self.claimants.len() > 1
    }
}
