//! Host-facing glue around the core: the navigation loop and the collaborators
//! it talks to.

pub mod commands;
pub mod navigation;
pub mod opener;
pub mod picker;
pub mod session;

pub use commands::{execute_command, Command, HostContext, SHOW_FILE_NAVIGATOR};
pub use navigation::NavState;
pub use opener::{opener_for, DocumentOpener, PrintOpener, SystemOpener};
pub use picker::{SelectionUi, TerminalPicker};
pub use session::{NavigationSession, SessionOutcome};
