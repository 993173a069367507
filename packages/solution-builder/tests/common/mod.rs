//! Common test utilities for solution-builder
//!
//! Fixtures describe descriptors; builders lay them out in a temporary tree
//! with their `.eval.json` snapshots.

#![allow(dead_code)]

mod builders;
mod fixtures;

// Re-export all utilities
pub use builders::*;
pub use fixtures::*;
