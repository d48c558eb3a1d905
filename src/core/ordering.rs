//! Deterministic listing order: directories first, then files, each group
//! sorted by path.

use super::Entry;
use std::cmp::Ordering;

/// Case-aware path comparison. Paths are compared case-insensitively first so
/// that `Makefile` sorts next to `main.rs` instead of ahead of every lowercase
/// name. Paths that differ only in case put the lowercase form first
/// (`readme` before `Readme`), the way editor file pickers order them.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| lowercase_first(a, b))
}

fn lowercase_first(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return y.is_lowercase().cmp(&x.is_lowercase()).then_with(|| x.cmp(&y));
        }
    }
    a.len().cmp(&b.len())
}

pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_directory()
        .cmp(&a.is_directory())
        .then_with(|| compare_paths(a.path(), b.path()))
}

pub fn sort_listing(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}
