//! Feature modules - one vertical slice per pipeline stage
//!
//! Run order:
//! evaluation → ingestion (+ source_scan) → dependency_graph → closure → emission

/// Project evaluator port and the snapshot adapter
pub mod evaluation;

/// Descriptor discovery, node construction, identity registry, write-back
pub mod ingestion;

/// Lexical `#import` / `#using` recovery from raw sources
pub mod source_scan;

/// Four-strategy edge inference over the node arena
pub mod dependency_graph;

/// Seeded / all-mode build closure
pub mod closure;

/// Solution file, DGML, debug listings, project-reference rewrite
pub mod emission;

/// External build manifest (seeds + explicit overrides)
pub mod manifest;

/// Source files no managed descriptor compiles
pub mod orphans;
