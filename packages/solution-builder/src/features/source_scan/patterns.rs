//! Directive patterns

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::utils::file_stem_of;

/// `#import "path"` with optional leading `//`
static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?://+\s*)?#\s*import\s*"([^"]*\w)*"(.*)$"#).expect("Invalid regex")
});

/// `#using <name>` with optional leading `//`
static USING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?://+\s*)?#\s*using.*<(.*)>.*$").expect("Invalid regex"));

/// Lowercase type library base name imported on this line
pub fn match_import(line: &str) -> Option<String> {
    let caps = IMPORT_PATTERN.captures(line)?;
    let stem = file_stem_of(caps.get(1)?.as_str().trim());
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_lowercase())
    }
}

/// Lowercase assembly token referenced on this line
pub fn match_using(line: &str) -> Option<String> {
    let caps = USING_PATTERN.captures(line)?;
    let token = caps.get(1)?.as_str().trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_lowercase())
    }
}
