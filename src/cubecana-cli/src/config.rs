//! Configuration management for the cubecana CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Feed cache used when nothing else is configured
pub const DEFAULT_CACHE_PATH: &str = "share/cards.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub cache_path: Option<PathBuf>,
    pub early_access_path: Option<PathBuf>,
    pub canonical_names_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    /// Ratings CSV, or a directory of per-power-band evaluation files
    pub ratings_path: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("cubecana");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Copy every field set in `update`; returns true if anything was set
    pub fn merge(&mut self, update: Config) -> bool {
        let mut changed = false;
        if let Some(path) = update.cache_path {
            self.cache_path = Some(path);
            changed = true;
        }
        if let Some(path) = update.early_access_path {
            self.early_access_path = Some(path);
            changed = true;
        }
        if let Some(path) = update.canonical_names_path {
            self.canonical_names_path = Some(path);
            changed = true;
        }
        if let Some(path) = update.database_path {
            self.database_path = Some(path);
            changed = true;
        }
        if let Some(url) = update.feed_url {
            self.feed_url = Some(url);
            changed = true;
        }
        if let Some(path) = update.ratings_path {
            self.ratings_path = Some(path);
            changed = true;
        }
        changed
    }

    pub fn get_cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH))
    }

    pub fn get_feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(cubecana::DEFAULT_FEED_URL)
    }

    pub fn get_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(cubecana_db::DEFAULT_DB_PATH))
    }
}
