//! One interactive navigation, from invocation to `Opened` or `Cancelled`.

use super::navigation::{self, NavState};
use super::opener::DocumentOpener;
use super::picker::SelectionUi;
use crate::config::NavigatorConfig;
use crate::core::{CoreError, DirectoryLister};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Opened(PathBuf),
    Cancelled,
}

/// Drives the lister and the picker until a file is opened or the picker is
/// dismissed. Only one listing is ever in flight.
pub struct NavigationSession {
    root: PathBuf,
    start_dir: String,
    lister: DirectoryLister,
}

impl NavigationSession {
    pub fn new(root: PathBuf, lister: DirectoryLister) -> Self {
        Self {
            root,
            start_dir: String::new(),
            lister,
        }
    }

    /// Builds a session from the configuration, starting next to the active
    /// document when there is one under `root`.
    pub fn from_config(
        root: PathBuf,
        active_document: Option<&Path>,
        config: &NavigatorConfig,
    ) -> Self {
        let start_dir = navigation::initial_dir(&root, active_document);
        Self::new(root, config.lister()).starting_in(start_dir)
    }

    pub fn starting_in(mut self, relative_dir: impl Into<String>) -> Self {
        self.start_dir = relative_dir.into();
        self
    }

    pub fn start_dir(&self) -> &str {
        &self.start_dir
    }

    /// Runs the session.
    ///
    /// A failed directory read is shown through `ui` and ends the session
    /// with that error; nothing is retried.
    pub async fn run<U, O>(&self, ui: &U, opener: &O) -> Result<SessionOutcome, CoreError>
    where
        U: SelectionUi + ?Sized,
        O: DocumentOpener + ?Sized,
    {
        tracing::info!(
            "Starting navigation in {:?} at {:?}",
            self.root,
            self.start_dir
        );
        let mut state = NavState::Browsing(self.start_dir.clone());

        loop {
            match state {
                NavState::Browsing(current_dir) => {
                    let listing = match self.lister.list(&self.root, &current_dir).await {
                        Ok(listing) => listing,
                        Err(e) => {
                            ui.show_error(&e.to_string()).await;
                            return Err(e);
                        }
                    };

                    let labels = navigation::picker_labels(&current_dir, &listing);
                    let placeholder = navigation::placeholder(&current_dir);
                    let selection = ui.pick(&labels, Some(&placeholder)).await;
                    tracing::debug!("Selection in {:?}: {:?}", current_dir, selection);

                    state = navigation::transition(&self.root, &current_dir, selection.as_deref());
                }
                NavState::Opened(path) => {
                    opener.open(&path);
                    return Ok(SessionOutcome::Opened(path));
                }
                NavState::Cancelled => {
                    tracing::info!("Navigation cancelled");
                    return Ok(SessionOutcome::Cancelled);
                }
            }
        }
    }
}
