//! XDG path resolution for kilo configuration and cache directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns `~/.config/kilo/` on Linux (`XDG_CONFIG_HOME/kilo`).
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns `~/.cache/kilo/` on Linux (`XDG_CACHE_HOME/kilo`).
    ///
    /// Holds readline history and log files.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns `~/.config/kilo/config.toml` on Linux.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }

    /// Directory for the rolling log files.
    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::cache_dir()?.join("logs"))
    }

    /// Readline history file for the plain REPL.
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::cache_dir()?.join(crate::constants::HISTORY_FILENAME))
    }
}
