//! Configuration types and path resolution for kilo.
//!
//! Settings live as TOML at the platform's XDG config path
//! (`~/.config/kilo/config.toml` on Linux), optionally overridden by a
//! `kilo.toml` in the current project. Logs and readline history go under
//! the XDG cache directory (`~/.cache/kilo/`).

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates the global config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            tracing::debug!("merging project config");
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
