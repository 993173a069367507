//! Source scanning
//!
//! Recovers dependency hints the structured metadata does not carry:
//! `#import "x.tlb"` (type library inputs) and `#using <x.dll>` (managed
//! assembly references). Matching is purely lexical, so a commented-out
//! directive still counts.

mod patterns;
mod scanner;

pub use patterns::{match_import, match_using};
pub use scanner::{scan_file, scan_sources, FileScan, SourceScan};
