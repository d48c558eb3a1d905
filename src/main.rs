use anyhow::{Context, Result};
use clap::Parser;
use file_navigator::app::{self, HostContext, SessionOutcome, TerminalPicker};
use file_navigator::config::{settings, NavigatorConfig, OpenerKind};
use file_navigator::core::Entry;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fnav")]
#[command(about = "Browse a project directory level by level and open a file")]
#[command(version)]
struct Cli {
    /// Project root (defaults to the current directory)
    root: Option<PathBuf>,

    /// Start next to this file when it lies under the root
    #[arg(long)]
    current_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hide paths matching this glob (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Disable a configured exclude pattern (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    includes: Vec<String>,

    /// Print the chosen path instead of opening it
    #[arg(long)]
    print: bool,

    /// Print the listing of DIR (relative to the root) and exit
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = "")]
    list: Option<String>,

    /// With --list, print the listing as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Command id to execute
    #[arg(long, default_value = app::SHOW_FILE_NAVIGATOR)]
    command: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "file_navigator=debug,fnav=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli, root: &std::path::Path) -> NavigatorConfig {
    let mut config = match settings::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config: {:#}. Using defaults.", e);
            NavigatorConfig::default()
        }
    }
    .with_workspace_excludes(root);

    config.merge_excludes(cli.excludes.iter().map(|p| (p.clone(), true)).collect());
    config.merge_excludes(cli.includes.iter().map(|p| (p.clone(), false)).collect());
    if cli.print {
        config.opener = OpenerKind::Print;
    }
    config
}

fn print_listing(listing: &[Entry], json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, listing)?;
        writeln!(stdout)?;
    } else {
        for entry in listing {
            writeln!(stdout, "{entry}")?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Invalid project root {}", root.display()))?;
    let config = load_config(&cli, &root);

    if let Some(dir) = &cli.list {
        let listing = config.lister().list(&root, dir).await?;
        return print_listing(&listing, cli.json);
    }

    let active_document = cli
        .current_file
        .as_ref()
        .map(|path| path.canonicalize().unwrap_or_else(|_| path.clone()));
    let opener = app::opener_for(config.opener);
    let host = HostContext {
        root,
        active_document,
        config,
    };
    let picker = TerminalPicker::stdio();

    match app::execute_command(&cli.command, &host, &picker, opener.as_ref()).await? {
        SessionOutcome::Opened(path) => tracing::info!("Opened {:?}", path),
        SessionOutcome::Cancelled => tracing::info!("Cancelled"),
    }
    Ok(())
}
