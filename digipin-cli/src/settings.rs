//! Configuration and saved state locations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use digipin_dispatch::DispatchConfig;
use digipin_places::LookupHistory;
use tracing::debug;

/// Get the XDG config directory for digipin
/// Uses $XDG_CONFIG_HOME/digipin on Linux/macOS, falls back to ~/.config/digipin
fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config);
        if path.is_absolute() {
            return Some(path.join("digipin"));
        }
    }

    dirs::home_dir().map(|h| h.join(".config").join("digipin"))
}

/// Default dispatch configuration file
pub fn dispatch_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("dispatch.json"))
}

fn history_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("history.json"))
}

/// Load dispatch configuration
///
/// An explicit path must exist. The default location may be absent, in
/// which case built-in defaults apply.
pub fn load_dispatch_config(explicit: Option<&Path>) -> Result<DispatchConfig> {
    if let Some(path) = explicit {
        return DispatchConfig::load(path)
            .with_context(|| format!("Failed to load dispatch config {}", path.display()));
    }

    match dispatch_config_path() {
        Some(path) => {
            debug!("Reading dispatch config from {}", path.display());
            DispatchConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load dispatch config {}", path.display()))
        }
        None => Ok(DispatchConfig::default()),
    }
}

/// Load lookup history; a missing or unreadable file yields an empty history
pub fn load_history() -> LookupHistory {
    history_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Save lookup history to disk
pub fn save_history(history: &LookupHistory) -> Result<()> {
    let path = history_path().context("Could not determine history path")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(history).context("Failed to serialize history")?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
