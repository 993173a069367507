//! Pipeline orchestration
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    SolutionBuilder::run()                     │
//! ├───────────────────────────────────────────────────────────────┤
//! │  1. Fatal checks: search root, build manifest                 │
//! │  2. Discover descriptors                                      │
//! │  3. Ingest (parallel per descriptor, source scan inline)      │
//! │  4. Edge discovery (four strategies, cycle report)            │
//! │  5. Build closure (seeded or all)                             │
//! │  6. Emit solution, DGML, debug listings                       │
//! │  7. Apply descriptor corrections                              │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-5 are [`SolutionBuilder::analyze`] and never write to disk.

mod solution_pipeline;

pub use solution_pipeline::{Analysis, RunReport, SolutionBuilder};
