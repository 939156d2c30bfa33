//! Saved search defaults, persisted as the same camelCase JSON the protocol uses.

use anyhow::{Context, Result};
use proxfind::SearchConfiguration;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULTS_ENV: &str = "PROXFIND_DEFAULTS";

/// Resolve the defaults file: explicit path, then `PROXFIND_DEFAULTS`, then
/// `$HOME/.config/proxfind/defaults.json`.
pub fn defaults_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(DEFAULTS_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .context("Cannot locate defaults: HOME is not set and no --defaults path was given")?;
    Ok(PathBuf::from(home).join(".config").join("proxfind").join("defaults.json"))
}

/// Load saved defaults. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<SearchConfiguration>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read defaults from {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse defaults in {}", path.display()))?;
    Ok(Some(config))
}

pub fn save(path: &Path, config: &SearchConfiguration) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("Failed to write defaults to {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved search defaults");
    Ok(())
}
