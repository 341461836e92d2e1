//! Config file resolution for the droop tools

use anyhow::{Context, Result};
use droop::Config;
use std::path::{Path, PathBuf};

/// Default config location: `<config dir>/droop/config.toml`
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("droop");

    Ok(config_dir.join("config.toml"))
}

/// Load the explicit config if given, else the default file if it exists,
/// else built-in defaults
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let Ok(path) = config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }

    tracing::debug!(path = %path.display(), "using config file");
    Config::from_path(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
