//! Per-file scanning
//!
//! Files are independent, so a node's sources are scanned with rayon and the
//! per-file results merged in input order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, error};

use super::patterns::{match_import, match_using};
use crate::errors::Result;

/// Directives found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub type_libraries: Vec<String>,
    pub using_assemblies: Vec<String>,
}

/// Merged directives for one node, deduplicated, first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceScan {
    pub type_libraries: Vec<String>,
    pub using_assemblies: Vec<String>,
    pub files_scanned: usize,
    pub files_failed: usize,
}

impl SourceScan {
    fn merge(&mut self, scan: FileScan) {
        self.files_scanned += 1;
        for name in scan.type_libraries {
            push_unique(&mut self.type_libraries, name);
        }
        for name in scan.using_assemblies {
            push_unique(&mut self.using_assemblies, name);
        }
    }
}

/// Scan one file; `with_using` enables the `#using` pattern
///
/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn scan_file(path: &Path, with_using: bool) -> Result<FileScan> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);

    let mut scan = FileScan::default();
    for line in text.lines() {
        if let Some(name) = match_import(line) {
            push_unique(&mut scan.type_libraries, name);
        }
        if with_using {
            if let Some(name) = match_using(line) {
                push_unique(&mut scan.using_assemblies, name);
            }
        }
    }
    Ok(scan)
}

/// Scan every file; unreadable files are reported and skipped
pub fn scan_sources(files: &[PathBuf], with_using: bool) -> SourceScan {
    let results: Vec<(&PathBuf, Result<FileScan>)> = files
        .par_iter()
        .map(|file| (file, scan_file(file, with_using)))
        .collect();

    let mut merged = SourceScan::default();
    for (file, result) in results {
        match result {
            Ok(scan) => merged.merge(scan),
            Err(e) => {
                error!(file = %file.display(), error = %e, "Cannot read source file, skipped");
                merged.files_failed += 1;
            }
        }
    }

    debug!(
        files = merged.files_scanned,
        failed = merged.files_failed,
        type_libraries = merged.type_libraries.len(),
        using = merged.using_assemblies.len(),
        "Source scan complete"
    );
    merged
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_file_collects_both_patterns() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "a.cpp",
            "#import \"Widgets.tlb\"\n#using <Core.dll>\n#import \"widgets.TLB\"\nint main() {}\n",
        );

        let scan = scan_file(&file, true).unwrap();
        assert_eq!(scan.type_libraries, vec!["widgets".to_string()]);
        assert_eq!(scan.using_assemblies, vec!["core.dll".to_string()]);

        let without_using = scan_file(&file, false).unwrap();
        assert!(without_using.using_assemblies.is_empty());
    }

    #[test]
    fn test_scan_sources_skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.h", "#import \"a.tlb\"\n");
        let b = write(&dir, "b.h", "// #import \"b.tlb\"\n#import \"a.tlb\"\n");
        let missing = dir.path().join("missing.cpp");

        let scan = scan_sources(&[a, missing, b], false);
        assert_eq!(scan.type_libraries, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(scan.files_scanned, 2);
        assert_eq!(scan.files_failed, 1);
    }

    #[test]
    fn test_scan_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.cpp");
        std::fs::write(&path, b"// caf\xe9\n#import \"x.tlb\"\n").unwrap();
        assert_eq!(scan_file(&path, false).unwrap().type_libraries, vec!["x".to_string()]);
    }
}
