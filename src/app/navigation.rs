//! The navigation state machine: pure transitions, no I/O.

use crate::core::paths::{normalize_relative, parent_of, relative_to_root};
use crate::core::{Entry, SEPARATOR};
use std::path::{Path, PathBuf};

/// Label of the synthetic "go up one level" choice.
pub const UP_LABEL: &str = "..";

/// Placeholder shown while browsing the root.
pub const ROOT_PLACEHOLDER: &str = "Select File";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    /// Showing the listing of a root-relative directory.
    Browsing(String),
    /// A file was picked; holds its absolute path.
    Opened(PathBuf),
    /// The picker was dismissed.
    Cancelled,
}

/// The directory a session starts in: the folder of the active document when
/// it lies under `root`, the root otherwise.
pub fn initial_dir(root: &Path, active_document: Option<&Path>) -> String {
    active_document
        .and_then(|doc| doc.parent())
        .and_then(|parent| relative_to_root(root, parent))
        .unwrap_or_default()
}

/// The choices presented for `current_dir`: `..` first unless at the root,
/// then the listing in order.
pub fn picker_labels(current_dir: &str, listing: &[Entry]) -> Vec<String> {
    let mut labels = Vec::with_capacity(listing.len() + 1);
    if !normalize_relative(current_dir).is_empty() {
        labels.push(UP_LABEL.to_string());
    }
    labels.extend(listing.iter().map(|entry| entry.path().to_string()));
    labels
}

pub fn placeholder(current_dir: &str) -> String {
    let dir = normalize_relative(current_dir);
    if dir.is_empty() {
        ROOT_PLACEHOLDER.to_string()
    } else {
        format!("{dir}{SEPARATOR}")
    }
}

/// Applies one picker result to `Browsing(current_dir)`.
pub fn transition(root: &Path, current_dir: &str, selection: Option<&str>) -> NavState {
    let Some(selection) = selection else {
        return NavState::Cancelled;
    };

    if selection == UP_LABEL {
        return NavState::Browsing(parent_of(current_dir));
    }

    let entry = Entry::from_label(selection);
    if entry.is_directory() {
        NavState::Browsing(normalize_relative(entry.relative_path()))
    } else {
        NavState::Opened(root.join(entry.relative_path()))
    }
}
