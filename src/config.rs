//! Configuration management for ReelTUI
//!
//! Handles config file loading/saving and API key management.
//! Config is stored at ~/.config/reeltui/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bundled TMDB API keys (from freekeys pool)
const TMDB_KEY_POOL: &[&str] = &[
    "fb7bb23f03b6994dafc674c074d01761",
    "e55425032d3d0f371fc776f302e7c09b",
    "8301a21598f8b45668d5711a814f01f6",
    "8cf43ad9c085135b9479ad5cf6bbcbda",
    "da63548086e399ffc910fbc08526df05",
    "13e53ff644a8bd4ba37b3e1044ad24f3",
    "269890f657dddf4635473cf4cf456576",
    "a2f888b27315e62e471b2d587048f32e",
];

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cached TMDB API key
    pub tmdb_api_key: Option<String>,
    /// Override for the library data directory
    pub data_dir: Option<PathBuf>,
    /// Default country for watch-provider display (alpha-2)
    pub default_country: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/reeltui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reeltui").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path =
            Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Cached key from config file
    /// 3. Random key from bundled pool (and cache it)
    pub fn get_tmdb_api_key(&mut self) -> String {
        // 1. Check environment variable first
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            return key;
        }

        // 2. Check cached key in config
        if let Some(ref key) = self.tmdb_api_key {
            return key.clone();
        }

        // 3. Pick random key from pool and cache it
        let key = Self::random_pool_key();
        self.tmdb_api_key = Some(key.clone());
        let _ = self.save(); // Best effort save
        key
    }

    /// Get a random key from the bundled pool
    pub fn random_pool_key() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as usize)
            .unwrap_or(0);
        let idx = seed % TMDB_KEY_POOL.len();
        TMDB_KEY_POOL[idx].to_string()
    }

    /// Country used when the provider screen first opens
    pub fn country(&self) -> &str {
        self.default_country.as_deref().unwrap_or("US")
    }
}
