use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::types::Sources;

/// Load the board list from `<root>/config/sources.yml`.
pub fn load_sources(root: &str) -> Result<Sources> {
    let path = PathBuf::from(root).join("config/sources.yml");
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read sources from {:?}", path))?;

    let sources: Sources =
        serde_yaml::from_str(&content).with_context(|| "Failed to parse sources YAML")?;

    Ok(sources)
}

/// Remove a previous run's export so a failed run never leaves a stale file
/// that looks current.
pub fn remove_stale_export(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
    }
    Ok(())
}
