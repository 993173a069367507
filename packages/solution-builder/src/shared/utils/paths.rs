//! Path helpers
//!
//! Descriptor values arrive in Windows form (`..\lib\core.lib`) no matter the
//! host, so name extraction splits on both separators and every comparison
//! goes through a lowercase key.

use std::path::{Component, Path, PathBuf};

/// Convert a descriptor path string into a host path
pub fn to_native(raw: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('\\', "/"))
    }
}

/// Last component of a descriptor path string, either separator
pub fn file_name_of(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// File name without its last extension
pub fn file_stem_of(raw: &str) -> &str {
    let name = file_name_of(raw);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}

/// Extension of the file name (without the dot), if any
pub fn extension_of(raw: &str) -> Option<&str> {
    let name = file_name_of(raw);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) if pos + 1 < name.len() => Some(&name[pos + 1..]),
        Some(_) => None,
    }
}

/// Absolute, lexically normalized path (`.` dropped, `..` folded)
///
/// Symlinks are not resolved.
pub fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Case-insensitive identity key for a path
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Path of `to` relative to the directory containing `from_file`, `/`-separated
pub fn relative_path(from_file: &Path, to: &Path) -> String {
    let from_dir: Vec<Component> = from_file
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let target: Vec<Component> = to.components().collect();

    let common = from_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| {
            a.as_os_str()
                .to_string_lossy()
                .eq_ignore_ascii_case(&b.as_os_str().to_string_lossy())
        })
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..".to_string());
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/")
}
