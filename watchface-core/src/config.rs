use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    condition::DisplayMode,
    face::WatchFace,
    message::{DecodeMode, MessageKeys},
};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Example TOML:
    /// [keys]
    /// high = "high"
    /// low = "low"
    /// condition_code = "weatherId"
    pub keys: MessageKeys,

    /// Reject messages that lack any of the keys.
    pub strict: bool,

    /// Show seconds while interactive.
    pub show_seconds: bool,

    /// Start in ambient mode.
    pub ambient: bool,
}

impl Config {
    pub fn decode_mode(&self) -> DecodeMode {
        DecodeMode::from_strict(self.strict)
    }

    /// Build a face with an empty display state from this configuration.
    pub fn face(&self) -> WatchFace {
        WatchFace::new(self.keys.clone(), self.decode_mode())
            .with_seconds(self.show_seconds)
            .with_mode(DisplayMode::from_ambient(self.ambient))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "sunshine", "watchface")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
