use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// "`project` depends on `depends_on`", supplied by the build manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDependencyDirective {
    pub project: PathBuf,
    pub depends_on: PathBuf,
}

impl ExtraDependencyDirective {
    pub fn new(project: impl Into<PathBuf>, depends_on: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            depends_on: depends_on.into(),
        }
    }
}
