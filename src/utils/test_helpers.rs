use std::fs;
use std::path::Path;
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
///
/// Guarded by a `Once` so parallel tests share one global subscriber. Honors
/// `RUST_LOG`, defaulting to debug output for this crate only.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("file_navigator=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Creates a directory tree under `root`. Paths ending in `/` become
/// directories, everything else an empty file (parents are created).
pub fn create_tree(root: &Path, paths: &[&str]) -> std::io::Result<()> {
    for path in paths {
        let target = root.join(path.trim_end_matches('/'));
        if path.ends_with('/') {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, "")?;
        }
    }
    Ok(())
}

/// Returns true when the current process runs as root (UID 0).
/// Permission-denied tests are skipped then, since root can read anything.
#[cfg(any(test, doctest))]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
