pub mod error;
pub mod ignore;
pub mod lister;
pub mod ordering;
pub mod paths;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used in every relative path handed out by this crate,
/// independent of the host platform.
pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One item of a listing.
///
/// The path is relative to the session root. A directory path always ends
/// with [`SEPARATOR`], a file path never does; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    path: String,
    kind: EntryKind,
}

impl Entry {
    pub fn directory(relative_path: &str) -> Self {
        let trimmed = relative_path.trim_end_matches(SEPARATOR);
        Self {
            path: format!("{trimmed}{SEPARATOR}"),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(relative_path: &str) -> Self {
        Self {
            path: relative_path.trim_end_matches(SEPARATOR).to_string(),
            kind: EntryKind::File,
        }
    }

    /// Rebuilds an entry from a listing label using the trailing separator
    /// convention.
    pub fn from_label(label: &str) -> Self {
        if label.ends_with(SEPARATOR) {
            Self::directory(label)
        } else {
            Self::file(label)
        }
    }

    /// The path as shown in a listing, including the directory suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path without the directory suffix.
    pub fn relative_path(&self) -> &str {
        self.path.trim_end_matches(SEPARATOR)
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// The sorted, filtered entries of one directory.
pub type Listing = Vec<Entry>;

pub use error::CoreError;
pub use ignore::{build_globset_from_patterns, is_visible, MatchOptions, PatternFilter};
pub use lister::{DirectoryLister, ProbeStrategy, StaleEntryPolicy};
pub use ordering::{compare_entries, sort_listing};
