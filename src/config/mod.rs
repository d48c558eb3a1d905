pub mod settings;

use crate::core::{DirectoryLister, MatchOptions, PatternFilter, ProbeStrategy, StaleEntryPolicy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Where a chosen file ends up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenerKind {
    /// Hand the file to the platform's default application.
    #[default]
    System,
    /// Write the absolute path to stdout.
    Print,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Glob pattern to "is excluded" flag. Only `true` entries are active.
    pub exclude: BTreeMap<String, bool>,
    pub stale_entry_policy: StaleEntryPolicy,
    pub probe: ProbeStrategy,
    pub case_insensitive_patterns: bool,
    pub match_basename: bool,
    pub opener: OpenerKind,
}

impl NavigatorConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    /// The patterns that take part in filtering, in map order.
    pub fn active_patterns(&self) -> Vec<String> {
        self.exclude
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(pattern, _)| pattern.clone())
            .collect()
    }

    /// Overlays another exclude mapping; its values win for shared keys.
    pub fn merge_excludes(&mut self, other: BTreeMap<String, bool>) {
        self.exclude.extend(other);
    }

    /// Merges `files.exclude` from the workspace settings under `root`, if any.
    pub fn with_workspace_excludes(mut self, root: &Path) -> Self {
        if let Some(excludes) = settings::load_workspace_excludes(root) {
            self.merge_excludes(excludes);
        }
        self
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_insensitive: self.case_insensitive_patterns,
            match_basename: self.match_basename,
        }
    }

    pub fn pattern_filter(&self) -> PatternFilter {
        PatternFilter::new(&self.active_patterns(), self.match_options())
    }

    /// A lister carrying this configuration's filter and probe settings.
    pub fn lister(&self) -> DirectoryLister {
        let lister = DirectoryLister::new()
            .with_stale_entry_policy(self.stale_entry_policy)
            .with_probe(self.probe);
        let filter = self.pattern_filter();
        if filter.is_empty() {
            lister
        } else {
            lister.with_filter(filter)
        }
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        let exclude = ["**/.git", "**/.svn", "**/.hg", "**/CVS", "**/.DS_Store"]
            .into_iter()
            .map(|pattern| (pattern.to_string(), true))
            .collect();

        Self {
            exclude,
            stale_entry_policy: StaleEntryPolicy::default(),
            probe: ProbeStrategy::default(),
            case_insensitive_patterns: false,
            match_basename: false,
            opener: OpenerKind::default(),
        }
    }
}
