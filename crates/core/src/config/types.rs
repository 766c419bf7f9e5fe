use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::HttpCatalogConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: HttpCatalogConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Bot front-end configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Command prefix, e.g. "." for `.random`.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Path of the preferences JSON document.
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
    /// Directory where the console transport stores attachments.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            preferences_path: default_preferences_path(),
            downloads_dir: default_downloads_dir(),
        }
    }
}

fn default_prefix() -> String {
    ".".to_string()
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("data/preferences.json")
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

/// Search engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// First backoff delay after a retryable fetch failure (ms).
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Backoff ceiling (ms).
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
    /// Non-matching draws (duplicates + filter misses) tolerated per search.
    #[serde(default = "default_max_rejections")]
    pub max_rejections: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
            max_rejections: default_max_rejections(),
        }
    }
}

fn default_backoff_base_ms() -> u64 {
    250
}

fn default_backoff_cap_ms() -> u64 {
    5_000
}

fn default_max_rejections() -> u32 {
    200
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub bot: BotConfig,
    pub search: SearchConfig,
}

/// Sanitized catalog config (API keys hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub admin_api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                admin_api_key_configured: config
                    .catalog
                    .admin_api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                timeout_secs: config.catalog.timeout_secs,
            },
            bot: config.bot.clone(),
            search: config.search.clone(),
        }
    }
}
