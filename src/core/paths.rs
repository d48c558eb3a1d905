//! String arithmetic on root-relative paths.
//!
//! Relative paths are always `/`-separated strings, with `""` standing for the
//! root itself. None of these functions touch the file system.

use super::SEPARATOR;
use std::path::{Component, Path};

/// Strips leading/trailing separators and `.` segments, resolves `..`
/// segments without ever climbing above the root.
pub fn normalize_relative(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Joins a directory and a child name. `dir` may carry a trailing separator.
pub fn join_relative(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches(SEPARATOR);
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

/// The parent of a relative directory; the root is its own parent.
pub fn parent_of(dir: &str) -> String {
    let dir = normalize_relative(dir);
    match dir.rfind(SEPARATOR) {
        Some(idx) => dir[..idx].to_string(),
        None => String::new(),
    }
}

/// Expresses `path` relative to `root`, or `None` if it lies outside of it or
/// contains segments that are not valid UTF-8.
pub fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(segments.join("/"))
}
