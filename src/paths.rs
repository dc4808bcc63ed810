//! Common paths for rickdex data storage
//!
//! All rickdex data is stored under ~/.config/rickdex/ on all platforms:
//! - config.toml - User configuration
//! - rickdex.sqlite - Favorites database

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the rickdex data directory (~/.config/rickdex/)
pub fn rickdex_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("rickdex");
    fs::create_dir_all(&dir).context("Failed to create rickdex directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/rickdex/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(rickdex_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/rickdex/rickdex.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(rickdex_dir()?.join("rickdex.sqlite"))
}
