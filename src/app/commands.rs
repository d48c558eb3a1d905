//! The command registry exposed to the host.
//!
//! Each registered id maps to one handler. There is a single command today:
//! starting a navigation session.

use super::opener::DocumentOpener;
use super::picker::SelectionUi;
use super::session::{NavigationSession, SessionOutcome};
use crate::config::NavigatorConfig;
use anyhow::Result;
use std::path::PathBuf;

pub const SHOW_FILE_NAVIGATOR: &str = "extension.showFileNavigator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShowFileNavigator,
}

impl Command {
    pub const ALL: &'static [Command] = &[Command::ShowFileNavigator];

    pub fn id(self) -> &'static str {
        match self {
            Command::ShowFileNavigator => SHOW_FILE_NAVIGATOR,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.id() == id)
    }
}

/// What the host hands over when a command runs.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub root: PathBuf,
    pub active_document: Option<PathBuf>,
    pub config: NavigatorConfig,
}

/// Looks up `id` and runs its handler.
pub async fn execute_command<U, O>(
    id: &str,
    host: &HostContext,
    ui: &U,
    opener: &O,
) -> Result<SessionOutcome>
where
    U: SelectionUi + ?Sized,
    O: DocumentOpener + ?Sized,
{
    let command = Command::from_id(id).ok_or_else(|| anyhow::anyhow!("Unknown command: {id}"))?;
    tracing::info!("Executing command {}", command.id());

    match command {
        Command::ShowFileNavigator => show_file_navigator(host, ui, opener).await,
    }
}

/// Runs one navigation session over the host's root.
pub async fn show_file_navigator<U, O>(
    host: &HostContext,
    ui: &U,
    opener: &O,
) -> Result<SessionOutcome>
where
    U: SelectionUi + ?Sized,
    O: DocumentOpener + ?Sized,
{
    let session = NavigationSession::from_config(
        host.root.clone(),
        host.active_document.as_deref(),
        &host.config,
    );
    Ok(session.run(ui, opener).await?)
}
