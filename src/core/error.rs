//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Reading a directory failed: it does not exist, access was denied, or
    /// the read broke off midway. No partial listing is ever returned.
    #[error("Failed to read directory {1}: {0}")]
    Storage(#[source] std::io::Error, PathBuf),

    /// An entry disappeared between the directory read and its type probe.
    /// Only raised under `StaleEntryPolicy::Abort`.
    #[error("Entry vanished while listing {1}: {0}")]
    StaleEntry(#[source] std::io::Error, PathBuf),

    /// Represents an error during the parsing or building of a glob pattern.
    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] globset::Error),
}

impl CoreError {
    pub fn is_storage(&self) -> bool {
        matches!(self, CoreError::Storage(..))
    }

    pub fn is_stale_entry(&self) -> bool {
        matches!(self, CoreError::StaleEntry(..))
    }

    /// The underlying I/O failure, if this error carries one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            CoreError::Storage(e, _) | CoreError::StaleEntry(e, _) => Some(e),
            _ => None,
        }
    }
}
