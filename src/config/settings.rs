use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::NavigatorConfig;

const APP_NAME: &str = "FileNavigator";
const CONFIG_FILE: &str = "config.json";

/// Workspace settings file that carries the project-wide `files.exclude` map.
const WORKSPACE_SETTINGS: &str = ".vscode/settings.json";
const WORKSPACE_EXCLUDE_KEY: &str = "files.exclude";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "filenavigator", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the configuration from `path`, or from the platform config file.
/// If the file doesn't exist, a default one is written.
/// If the file cannot be parsed, a warning is logged and the defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<NavigatorConfig> {
    let config_path = resolve_config_path(path)?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = NavigatorConfig::default();
        save_config(&default_config, Some(&config_path))?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

    match serde_json::from_str::<NavigatorConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(NavigatorConfig::default())
        }
    }
}

/// Saves the configuration to `path`, or to the platform config file.
pub fn save_config(config: &NavigatorConfig, path: Option<&Path>) -> Result<()> {
    let config_path = resolve_config_path(path)?;

    if let Some(config_dir) = config_path.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
    }

    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

/// Exports the configuration to a user-specified JSON file.
pub fn export_config(config: &NavigatorConfig, export_path: &Path) -> Result<()> {
    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(export_path, config_json)?;
    tracing::info!("Exported config to {:?}", export_path);
    Ok(())
}

/// Imports a configuration from a user-specified JSON file. Unlike
/// `load_config`, a malformed file is an error here.
pub fn import_config(import_path: &Path) -> Result<NavigatorConfig> {
    let config_content = fs::read_to_string(import_path)
        .with_context(|| format!("Failed to read {}", import_path.display()))?;
    let config = serde_json::from_str::<NavigatorConfig>(&config_content)
        .with_context(|| format!("Invalid config file {}", import_path.display()))?;
    tracing::info!("Imported config from {:?}", import_path);
    Ok(config)
}

/// JavaScript-style truthiness, which is how editors read exclude flags:
/// `{ "**/*.js": { "when": "$(basename).ts" } }` counts as enabled.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Translates a raw `pattern -> value` JSON object into exclude flags.
pub fn parse_exclude_map(value: &Value) -> Option<BTreeMap<String, bool>> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .map(|(pattern, flag)| (pattern.clone(), is_truthy(flag)))
            .collect(),
    )
}

/// Reads `files.exclude` from the workspace settings under `root`.
///
/// Returns `None` when the file is absent, unreadable, or not plain JSON;
/// the last two cases are logged.
pub fn load_workspace_excludes(root: &Path) -> Option<BTreeMap<String, bool>> {
    let settings_path = root.join(WORKSPACE_SETTINGS);
    if !settings_path.is_file() {
        return None;
    }

    let content = match fs::read_to_string(&settings_path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read workspace settings {:?}: {}", settings_path, e);
            return None;
        }
    };

    let settings: Value = match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                "Ignoring workspace settings {:?}, not valid JSON: {}",
                settings_path,
                e
            );
            return None;
        }
    };

    let excludes = settings.get(WORKSPACE_EXCLUDE_KEY).and_then(parse_exclude_map)?;
    tracing::debug!(
        "Loaded {} exclude patterns from {:?}",
        excludes.len(),
        settings_path
    );
    Some(excludes)
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.filenavigator.FileNavigator/
// Linux:   ~/.config/filenavigator/
// Windows: %APPDATA%/filenavigator/FileNavigator/config/
