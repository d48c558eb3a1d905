//! Reads one directory level and turns it into a sorted, filtered listing.

use super::ordering::sort_listing;
use super::paths::{join_relative, normalize_relative};
use super::{CoreError, Entry, Listing, PatternFilter};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::DirEntry;

/// What to do with an entry that disappears between the directory read and
/// its type probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleEntryPolicy {
    /// Leave the entry out and keep listing.
    #[default]
    Skip,
    /// Fail the whole listing with `CoreError::StaleEntry`.
    Abort,
}

/// How an entry is classified as directory or file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStrategy {
    /// A separate `stat` per entry, following symlinks.
    #[default]
    Stat,
    /// Reuse the type reported by the directory read; only symlinks fall back
    /// to a `stat` to learn what they point at.
    DirEntry,
}

/// Lists a single directory relative to a root.
///
/// Holds no state between calls: every `list` re-reads storage.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLister {
    filter: Option<PatternFilter>,
    stale_entry_policy: StaleEntryPolicy,
    probe: ProbeStrategy,
}

impl DirectoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: PatternFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_stale_entry_policy(mut self, policy: StaleEntryPolicy) -> Self {
        self.stale_entry_policy = policy;
        self
    }

    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }

    /// Lists `relative_dir` under `root`.
    ///
    /// A failing directory read yields `CoreError::Storage` and no entries.
    pub async fn list(&self, root: &Path, relative_dir: &str) -> Result<Listing, CoreError> {
        let relative_dir = normalize_relative(relative_dir);
        let candidates = self.read_candidates(root, &relative_dir).await?;
        let listing = self.classify(root, candidates).await?;

        tracing::debug!(
            "Listed {} entries in {:?}",
            listing.len(),
            if relative_dir.is_empty() { "." } else { relative_dir.as_str() }
        );
        Ok(listing)
    }

    /// Classifies one root-relative path as a directory or file entry.
    ///
    /// `Ok(None)` means the entry no longer exists and the skip policy
    /// dropped it. A symlink whose target cannot be resolved still exists, so
    /// it is listed as a file. Any other failure, such as a directory that can
    /// be read but not searched, is a `CoreError::Storage`.
    pub async fn probe_entry(
        &self,
        root: &Path,
        relative_path: &str,
    ) -> Result<Option<Entry>, CoreError> {
        let target = root.join(relative_path);
        let probe_error = match tokio::fs::metadata(&target).await {
            Ok(metadata) if metadata.is_dir() => return Ok(Some(Entry::directory(relative_path))),
            Ok(_) => return Ok(Some(Entry::file(relative_path))),
            Err(e) => e,
        };

        match tokio::fs::symlink_metadata(&target).await {
            Ok(link) if link.file_type().is_symlink() => {
                tracing::debug!(
                    "Listing unresolvable symlink {:?} as a file: {}",
                    target,
                    probe_error
                );
                Ok(Some(Entry::file(relative_path)))
            }
            Ok(_) => Err(CoreError::Storage(probe_error, target)),
            Err(e) if e.kind() == ErrorKind::NotFound => match self.stale_entry_policy {
                StaleEntryPolicy::Skip => {
                    tracing::warn!("Skipping vanished entry {:?}: {}", target, e);
                    Ok(None)
                }
                StaleEntryPolicy::Abort => Err(CoreError::StaleEntry(e, target)),
            },
            Err(e) => Err(CoreError::Storage(e, target)),
        }
    }

    /// Reads the entry names of one directory and drops the ignored ones.
    async fn read_candidates(
        &self,
        root: &Path,
        relative_dir: &str,
    ) -> Result<Vec<(String, DirEntry)>, CoreError> {
        let base_path = root.join(relative_dir);

        let mut read_dir = tokio::fs::read_dir(&base_path)
            .await
            .map_err(|e| CoreError::Storage(e, base_path.clone()))?;

        let mut candidates = Vec::new();
        while let Some(dir_entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| CoreError::Storage(e, base_path.clone()))?
        {
            let name = match dir_entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(
                        "Skipping entry with non UTF-8 name {:?} in {:?}",
                        raw,
                        base_path
                    );
                    continue;
                }
            };

            let relative_path = join_relative(relative_dir, &name);
            if let Some(filter) = &self.filter {
                if !filter.is_visible(&relative_path) {
                    tracing::trace!("Ignored by pattern: {}", relative_path);
                    continue;
                }
            }
            candidates.push((relative_path, dir_entry));
        }
        Ok(candidates)
    }

    /// Probes every candidate and returns them in listing order.
    async fn classify(
        &self,
        root: &Path,
        candidates: Vec<(String, DirEntry)>,
    ) -> Result<Listing, CoreError> {
        let mut listing = Vec::with_capacity(candidates.len());
        for (relative_path, dir_entry) in candidates {
            if self.probe == ProbeStrategy::DirEntry {
                match dir_entry.file_type().await {
                    Ok(file_type) if !file_type.is_symlink() => {
                        listing.push(if file_type.is_dir() {
                            Entry::directory(&relative_path)
                        } else {
                            Entry::file(&relative_path)
                        });
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("No file type for {}, probing: {}", relative_path, e);
                    }
                }
            }
            if let Some(entry) = self.probe_entry(root, &relative_path).await? {
                listing.push(entry);
            }
        }

        sort_listing(&mut listing);
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchOptions;
    use crate::utils::test_helpers::{create_tree, running_as_root, setup_test_logging};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn project() -> TempDir {
        let dir = tempdir().expect("Failed to create temp dir");
        create_tree(dir.path(), &["src/", "node_modules/left-pad/index.js", "README.md"]).unwrap();
        dir
    }

    fn labels(listing: &Listing) -> Vec<&str> {
        listing.iter().map(Entry::path).collect()
    }

    fn lister_ignoring(patterns: &[&str]) -> DirectoryLister {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        DirectoryLister::new().with_filter(PatternFilter::new(&patterns, MatchOptions::default()))
    }

    #[tokio::test]
    async fn test_root_listing_with_ignored_directory() {
        setup_test_logging();
        let dir = project();

        let listing = lister_ignoring(&["node_modules/**"]).list(dir.path(), "").await.unwrap();

        assert_eq!(labels(&listing), ["src/", "README.md"]);
    }

    #[tokio::test]
    async fn test_empty_directory_lists_nothing() {
        let dir = project();
        let listing = lister_ignoring(&["node_modules/**"]).list(dir.path(), "src").await.unwrap();
        assert!(listing.is_empty());
    }

    #[tokio::test]
    async fn test_without_filter_everything_is_listed() {
        let dir = project();
        let listing = DirectoryLister::new().list(dir.path(), "").await.unwrap();
        assert_eq!(labels(&listing), ["node_modules/", "src/", "README.md"]);
    }

    #[tokio::test]
    async fn test_extension_pattern() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();

        let listing = lister_ignoring(&["*.log"]).list(dir.path(), "").await.unwrap();

        assert_eq!(labels(&listing), ["b.txt"]);
    }

    #[tokio::test]
    async fn test_nested_listing_paths_are_root_relative() {
        let dir = project();
        let listing = DirectoryLister::new()
            .list(dir.path(), "node_modules/")
            .await
            .unwrap();
        assert_eq!(labels(&listing), ["node_modules/left-pad/"]);

        let listing = DirectoryLister::new()
            .list(dir.path(), "node_modules/left-pad")
            .await
            .unwrap();
        assert_eq!(labels(&listing), ["node_modules/left-pad/index.js"]);
    }

    #[tokio::test]
    async fn test_patterns_see_relative_path_of_nested_entries() {
        let dir = project();
        fs::write(dir.path().join("src/gen.rs"), "").unwrap();
        fs::write(dir.path().join("gen.rs"), "").unwrap();

        let lister = lister_ignoring(&["src/gen.rs"]);

        assert!(lister.list(dir.path(), "src").await.unwrap().is_empty());
        assert!(labels(&lister.list(dir.path(), "").await.unwrap()).contains(&"gen.rs"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_storage_error() {
        let dir = project();
        let err = DirectoryLister::new()
            .list(dir.path(), "does-not-exist")
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::NotFound)
        );
    }

    #[tokio::test]
    async fn test_listing_a_file_is_storage_error() {
        let dir = project();
        let err = DirectoryLister::new()
            .list(dir.path(), "README.md")
            .await
            .unwrap_err();
        assert!(err.is_storage());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_permission_denied_is_storage_error() {
        use std::os::unix::fs::PermissionsExt;

        if running_as_root() {
            return;
        }
        let dir = project();
        let locked = dir.path().join("src");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = DirectoryLister::new().list(dir.path(), "src").await;

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let err = result.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_repeated_listing_is_identical() {
        let dir = project();
        let lister = lister_ignoring(&["node_modules/**"]);
        let first = lister.list(dir.path(), "").await.unwrap();
        let second = lister.list(dir.path(), "").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_listing_reflects_changes_between_calls() {
        let dir = project();
        let lister = DirectoryLister::new();
        assert!(lister.list(dir.path(), "src").await.unwrap().is_empty());

        fs::write(dir.path().join("src/lib.rs"), "").unwrap();

        assert_eq!(labels(&lister.list(dir.path(), "src").await.unwrap()), ["src/lib.rs"]);
    }

    #[tokio::test]
    async fn test_suffix_matches_probe_for_both_strategies() {
        let dir = project();
        for probe in [ProbeStrategy::Stat, ProbeStrategy::DirEntry] {
            let listing = DirectoryLister::new()
                .with_probe(probe)
                .list(dir.path(), "")
                .await
                .unwrap();
            for entry in &listing {
                let on_disk = dir.path().join(entry.relative_path()).is_dir();
                assert_eq!(entry.is_directory(), on_disk, "{probe:?}: {entry}");
                assert_eq!(entry.path().ends_with('/'), on_disk);
            }
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directory_is_listed_as_directory() {
        let dir = project();
        std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("src-link")).unwrap();

        for probe in [ProbeStrategy::Stat, ProbeStrategy::DirEntry] {
            let listing = DirectoryLister::new()
                .with_probe(probe)
                .list(dir.path(), "")
                .await
                .unwrap();
            assert!(labels(&listing).contains(&"src-link/"), "{probe:?}");
        }
    }

    #[tokio::test]
    async fn test_entry_removed_after_read_is_skipped_by_default() {
        setup_test_logging();
        let dir = project();
        let lister = DirectoryLister::new();

        let candidates = lister.read_candidates(dir.path(), "").await.unwrap();
        fs::remove_file(dir.path().join("README.md")).unwrap();
        let listing = lister.classify(dir.path(), candidates).await.unwrap();

        assert_eq!(labels(&listing), ["node_modules/", "src/"]);
    }

    #[tokio::test]
    async fn test_entry_removed_after_read_aborts_under_abort_policy() {
        let dir = project();
        let lister = DirectoryLister::new().with_stale_entry_policy(StaleEntryPolicy::Abort);

        let candidates = lister.read_candidates(dir.path(), "").await.unwrap();
        fs::remove_dir(dir.path().join("src")).unwrap();
        let err = lister.classify(dir.path(), candidates).await.unwrap_err();

        assert!(err.is_stale_entry());
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::NotFound)
        );
    }

    #[tokio::test]
    async fn test_probe_of_missing_entry_follows_policy() {
        let dir = project();

        let skipped = DirectoryLister::new().probe_entry(dir.path(), "gone.txt").await;
        assert!(matches!(skipped, Ok(None)));

        let aborted = DirectoryLister::new()
            .with_stale_entry_policy(StaleEntryPolicy::Abort)
            .probe_entry(dir.path(), "gone.txt")
            .await;
        assert!(aborted.unwrap_err().is_stale_entry());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_listed_as_file() {
        let dir = tempdir().unwrap();
        create_tree(dir.path(), &["kept.txt"]).unwrap();
        std::os::unix::fs::symlink("never-existed", dir.path().join("broken-link")).unwrap();

        for probe in [ProbeStrategy::Stat, ProbeStrategy::DirEntry] {
            for policy in [StaleEntryPolicy::Skip, StaleEntryPolicy::Abort] {
                let listing = DirectoryLister::new()
                    .with_probe(probe)
                    .with_stale_entry_policy(policy)
                    .list(dir.path(), "")
                    .await
                    .unwrap();
                assert_eq!(labels(&listing), ["broken-link", "kept.txt"], "{probe:?} {policy:?}");
            }
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ignored_dangling_symlink_is_hidden() {
        let dir = project();
        std::os::unix::fs::symlink("never-existed", dir.path().join("dangling")).unwrap();

        let listing = lister_ignoring(&["dangling"]).list(dir.path(), "").await.unwrap();

        assert_eq!(labels(&listing), ["node_modules/", "src/", "README.md"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unsearchable_directory_is_storage_error() {
        use std::os::unix::fs::PermissionsExt;

        if running_as_root() {
            return;
        }
        let dir = project();
        fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        let locked = dir.path().join("src");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

        let result = DirectoryLister::new().list(dir.path(), "src").await;

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let err = result.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::PermissionDenied)
        );
    }
}
