//! Pattern filter deciding which root-relative paths are hidden from listings.

use super::{CoreError, SEPARATOR};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Knobs for the glob dialect. The defaults give plain shell-glob behaviour:
/// `*` stays inside a segment, `**` crosses segments, matching is
/// case-sensitive and anchored at the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub case_insensitive: bool,
    /// Also match patterns without a separator against the last segment of
    /// the path, wherever it sits in the tree (`*.log` hides `a/b/c.log`).
    pub match_basename: bool,
}

/// Expands one pattern into the globs that implement it.
///
/// `dir/` and `dir/**` both hide the directory itself as well as its
/// contents, so `node_modules/**` removes the `node_modules/` entry from the
/// root listing instead of leaving an empty directory behind.
fn expand_pattern(pattern: &str, options: MatchOptions) -> Vec<String> {
    let mut expanded = Vec::with_capacity(2);

    if let Some(dir_pattern) = pattern.strip_suffix(SEPARATOR) {
        expanded.push(dir_pattern.to_string());
        expanded.push(format!("{dir_pattern}/**"));
    } else {
        expanded.push(pattern.to_string());
        if let Some(prefix) = pattern.strip_suffix("/**") {
            if !prefix.is_empty() {
                expanded.push(prefix.to_string());
            }
        }
    }

    if options.match_basename && !pattern.trim_end_matches(SEPARATOR).contains(SEPARATOR) {
        let anywhere: Vec<String> = expanded.iter().map(|p| format!("**/{p}")).collect();
        expanded.extend(anywhere);
    }

    expanded
}

fn build_glob(pattern: &str, options: MatchOptions) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .case_insensitive(options.case_insensitive)
        .build()
}

/// Builds a `GlobSet` from a list of ignore patterns.
///
/// Blank lines and `#` comments are skipped. Invalid patterns are logged and
/// dropped, so one typo in the configuration does not disable every other
/// exclude.
pub fn build_globset_from_patterns(patterns: &[String], options: MatchOptions) -> GlobSet {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let trimmed_pattern = pattern.trim();
        if trimmed_pattern.is_empty() || trimmed_pattern.starts_with('#') {
            continue;
        }

        for expanded in expand_pattern(trimmed_pattern, options) {
            match build_glob(&expanded, options) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    tracing::warn!("Skipping invalid ignore pattern {:?}: {}", trimmed_pattern, e);
                    break;
                }
            }
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::error!("Failed to build glob set from patterns: {}", e);
        GlobSet::empty()
    })
}

/// A compiled ignore pattern set.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    set: GlobSet,
}

impl PatternFilter {
    pub fn new(patterns: &[String], options: MatchOptions) -> Self {
        Self {
            set: build_globset_from_patterns(patterns, options),
        }
    }

    /// Like [`PatternFilter::new`], but rejects the whole set if any pattern
    /// fails to parse.
    pub fn try_new(patterns: &[String], options: MatchOptions) -> Result<Self, CoreError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let trimmed_pattern = pattern.trim();
            if trimmed_pattern.is_empty() || trimmed_pattern.starts_with('#') {
                continue;
            }
            for expanded in expand_pattern(trimmed_pattern, options) {
                builder.add(build_glob(&expanded, options)?);
            }
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// `false` if the root-relative path matches at least one pattern.
    pub fn is_visible(&self, relative_path: &str) -> bool {
        let path = relative_path.trim_end_matches(SEPARATOR);
        !self.set.is_match(path)
    }
}

/// One-shot form of [`PatternFilter::is_visible`] with default options.
pub fn is_visible(relative_path: &str, patterns: &[String]) -> bool {
    patterns.is_empty()
        || PatternFilter::new(patterns, MatchOptions::default()).is_visible(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_empty_pattern_set_hides_nothing() {
        assert!(is_visible("anything/at/all.txt", &[]));
        assert!(PatternFilter::empty().is_visible("node_modules"));
    }

    #[test]
    fn test_star_stays_within_segment() {
        let set = patterns(&["*.log"]);
        assert!(!is_visible("a.log", &set));
        assert!(is_visible("b.txt", &set));
        assert!(is_visible("logs/a.log", &set));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let set = patterns(&["**/*.log"]);
        assert!(!is_visible("a.log", &set));
        assert!(!is_visible("logs/deep/a.log", &set));
    }

    #[test]
    fn test_directory_glob_hides_directory_itself() {
        let set = patterns(&["node_modules/**"]);
        assert!(!is_visible("node_modules", &set));
        assert!(!is_visible("node_modules/left-pad/index.js", &set));
        assert!(is_visible("src", &set));
    }

    #[test]
    fn test_trailing_separator_pattern() {
        let set = patterns(&["target/"]);
        assert!(!is_visible("target", &set));
        assert!(!is_visible("target/debug", &set));
        assert!(is_visible("targets", &set));
    }

    #[test]
    fn test_patterns_match_relative_paths_not_basenames() {
        let set = patterns(&["src/generated"]);
        assert!(!is_visible("src/generated", &set));
        assert!(is_visible("generated", &set));
    }

    #[test]
    fn test_match_basename_option() {
        let options = MatchOptions {
            match_basename: true,
            ..MatchOptions::default()
        };
        let filter = PatternFilter::new(&patterns(&["*.log", "build/"]), options);
        assert!(!filter.is_visible("a/b/c.log"));
        assert!(!filter.is_visible("crates/core/build"));
        assert!(filter.is_visible("crates/core/src"));
    }

    #[test]
    fn test_case_insensitive_option() {
        let options = MatchOptions {
            case_insensitive: true,
            ..MatchOptions::default()
        };
        let filter = PatternFilter::new(&patterns(&["*.LOG"]), options);
        assert!(!filter.is_visible("debug.log"));
        let sensitive = PatternFilter::new(&patterns(&["*.LOG"]), MatchOptions::default());
        assert!(sensitive.is_visible("debug.log"));
    }

    #[test]
    fn test_brace_alternation() {
        let set = patterns(&["*.{tmp,bak}"]);
        assert!(!is_visible("a.tmp", &set));
        assert!(!is_visible("a.bak", &set));
        assert!(is_visible("a.rs", &set));
    }

    #[test]
    fn test_comments_and_blanks_are_ignored() {
        let filter = PatternFilter::new(&patterns(&["", "   ", "# *.rs"]), MatchOptions::default());
        assert!(filter.is_empty());
        assert!(filter.is_visible("main.rs"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped_leniently() {
        let filter = PatternFilter::new(&patterns(&["a[", "*.log"]), MatchOptions::default());
        assert!(!filter.is_visible("x.log"));
        assert!(filter.is_visible("a["));
    }

    #[test]
    fn test_invalid_pattern_is_rejected_strictly() {
        let result = PatternFilter::try_new(&patterns(&["a["]), MatchOptions::default());
        assert!(matches!(result, Err(CoreError::GlobPattern(_))));
    }

    proptest! {
        #[test]
        fn prop_single_segment_extension_filter(name in "[a-z]{1,6}", ext in "(log|txt|rs)") {
            let path = format!("{name}.{ext}");
            prop_assert_eq!(is_visible(&path, &patterns(&["*.log"])), ext != "log");
        }

        #[test]
        fn prop_nested_paths_escape_single_star(dir in "[a-z]{1,6}", name in "[a-z]{1,6}") {
            let path = format!("{dir}/{name}.log");
            prop_assert!(is_visible(&path, &patterns(&["*.log"])));
            prop_assert!(!is_visible(&path, &patterns(&["**/*.log"])));
        }
    }
}
