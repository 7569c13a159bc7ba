//! Process configuration, read from the environment.

use std::path::PathBuf;

use anyhow::Context;

/// Overrides the directory holding `<Character>.txt` inventory files.
pub const INVENTORY_DIR_ENV: &str = "SATCHEL_INVENTORY_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub inventory_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let inventory_dir = match lookup(INVENTORY_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir.trim()),
            None => {
                tracing::debug!("{INVENTORY_DIR_ENV} not set; using the default data directory");
                default_inventory_dir()?
            }
        };
        Ok(Self { inventory_dir })
    }
}

/// `{data_dir}/satchel`, or `~/.local/share/satchel` where no data dir is known.
fn default_inventory_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context(
            "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share",
        )?;
    dir.push("satchel");
    Ok(dir)
}
