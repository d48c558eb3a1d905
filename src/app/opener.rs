//! Defines an abstraction over opening the chosen document.

use crate::config::OpenerKind;
use std::io::Write;
use std::path::Path;

/// A trait that abstracts opening a file.
/// This is "fire-and-forget" and doesn't return a result; implementations log
/// their own failures.
pub trait DocumentOpener: Send + Sync {
    fn open(&self, path: &Path);
}

/// Opens the file with the platform's default application.
pub struct SystemOpener;

impl DocumentOpener for SystemOpener {
    fn open(&self, path: &Path) {
        tracing::info!("Opening {:?}", path);
        if let Err(e) = open::that_detached(path) {
            tracing::warn!("Failed to open {:?}: {}", path, e);
        }
    }
}

/// Prints the absolute path on stdout, for `$EDITOR "$(fnav --print)"`.
pub struct PrintOpener;

impl DocumentOpener for PrintOpener {
    fn open(&self, path: &Path) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", path.display()) {
            tracing::warn!("Failed to print {:?}: {}", path, e);
        }
    }
}

pub fn opener_for(kind: OpenerKind) -> Box<dyn DocumentOpener> {
    match kind {
        OpenerKind::System => Box::new(SystemOpener),
        OpenerKind::Print => Box::new(PrintOpener),
    }
}
