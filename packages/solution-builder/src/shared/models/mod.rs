//! Shared models

mod directive;
mod duplicate;
mod project_node;

pub use directive::ExtraDependencyDirective;
pub use duplicate::Duplicate;
pub use project_node::{NativeOutputs, ProjectKind, ProjectNode};
