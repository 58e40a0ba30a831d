//! Settings manager
//!
//! Owns the active [`Config`] and the file it was read from.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SettingsError};

const APP_DIR: &str = "strataview";
const CONFIG_FILE: &str = "config.toml";

/// Loads, holds and persists the application configuration.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    path: PathBuf,
    config: Config,
}

impl SettingsManager {
    /// Platform configuration directory for StrataView.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Create the configuration directory if missing.
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Open the config in the platform configuration directory.
    pub fn open_default() -> Result<Self> {
        let dir = Self::ensure_config_dir()?;
        Self::open(dir.join(CONFIG_FILE))
    }

    /// Open the config at `path`, writing defaults there if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = if path.exists() {
            Config::load_from_file(&path)?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let config = Config::default();
            config.save_to_file(&path)?;
            tracing::info!("Created default config at {}", path.display());
            config
        };
        Ok(Self { path, config })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access; call [`save`](Self::save) to persist.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Write the current configuration back to its file.
    pub fn save(&self) -> Result<()> {
        self.config.save_to_file(&self.path)
    }

    /// Discard in-memory changes and read the file again.
    pub fn reload(&mut self) -> Result<()> {
        self.config = Config::load_from_file(&self.path)?;
        Ok(())
    }
}
