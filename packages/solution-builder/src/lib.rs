/*
 * Solution Builder - Project Dependency Graph Engine
 *
 * Feature-First Architecture:
 * - shared/      : Common models (ProjectNode, Duplicate, directives) and path utils
 * - features/    : Vertical slices (evaluation → ingestion → source_scan →
 *                  dependency_graph → closure → emission), plus the build
 *                  manifest reader and the orphan finder
 * - pipeline/    : Run orchestration
 * - config/      : Versioned YAML run configuration
 *
 * Performance:
 * - Rayon work-stealing for descriptor ingestion and source scanning
 * - Strictly sequential mode for determinism-sensitive debugging
 */

/// Shared models and utilities
pub mod shared;

/// Feature modules (pipeline stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, SolutionConfig};
pub use errors::{Result, SolutionError};
pub use features::closure::{BuildClosure, ClosureMode};
pub use features::dependency_graph::{DependencyGraphBuilder, DependencyKind, ProjectGraph};
pub use features::evaluation::{EvaluatedDescriptor, ProjectEvaluator, SnapshotEvaluator};
pub use pipeline::{Analysis, RunReport, SolutionBuilder};
pub use shared::models::{Duplicate, ExtraDependencyDirective, ProjectKind, ProjectNode};
