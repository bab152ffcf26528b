//! Remote configuration settings.
//!
//! Settings are read from `~/.config/firstbeat/remote-config.json`. Every
//! field is optional; a missing file or field falls back to the built-in
//! defaults below.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "firstbeat";

/// Config file name
const CONFIG_FILE: &str = "remote-config.json";

/// Origin serving the remote JSON content.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/jasonhuge/firstBeatConfig/main/";

/// Path to the JSON folder under the base URL.
pub const JSON_PATH: &str = "json/";

/// How long a cached resource stays valid, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Longest accepted cache TTL (one year), in seconds.
pub const MAX_CACHE_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Directory name of the cache namespace under the cache root.
pub const CACHE_NAMESPACE: &str = "RemoteConfig";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub cache_ttl_secs: Option<i64>,
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Cache TTL, clamped to between one second and one year.
    pub fn cache_ttl(&self) -> Duration {
        let secs = self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Duration::seconds(secs.clamp(1, MAX_CACHE_TTL_SECS))
    }

    /// Root of the cache namespace, e.g. `~/.cache/firstbeat/RemoteConfig`.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.join(CACHE_NAMESPACE));
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(CACHE_NAMESPACE))
    }
}
