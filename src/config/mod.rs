//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/spot-scout/config.toml
//!
//! API credentials can also come from the environment (SPOT_SCOUT_API_KEY,
//! SPOT_SCOUT_API_SECRET), which wins over the file.

pub mod defaults;

use crate::error::{Error, Result};
use crate::geocode::ResolverOptions;
use crate::pipeline::DiscoverOptions;
use crate::search::relevance::{FilterConfig, FilterStrength};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR_NAME: &str = "spot-scout";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment override for the API key
pub const ENV_API_KEY: &str = "SPOT_SCOUT_API_KEY";
/// Environment override for the signing secret
pub const ENV_API_SECRET: &str = "SPOT_SCOUT_API_SECRET";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub geocode: GeocodeConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub filter: FilterSection,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Upstream provider credentials and selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Geocoding/search provider name ("amap" or "baidu")
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub key: String,

    /// Shared secret for request signing; requests go unsigned without it
    #[serde(default)]
    pub secret: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            key: String::new(),
            secret: String::new(),
        }
    }
}

/// Geocoding behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Append the street address to geocoding queries
    #[serde(default)]
    pub include_address: bool,

    #[serde(default = "default_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            include_address: false,
            request_delay_ms: default_delay_ms(),
        }
    }
}

/// Spot search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            request_delay_ms: default_delay_ms(),
        }
    }
}

/// Relevance filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_strength")]
    pub strength: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: default_strength(),
            max_results: default_max_results(),
            min_score: default_min_score(),
        }
    }
}

/// Cache file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the cache JSON files
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from a specific path (for testing)
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// API key: environment override, then the config file; empty is fatal
    pub fn api_key(&self) -> Result<String> {
        let key = std::env::var(ENV_API_KEY).unwrap_or_else(|_| self.api.key.clone());
        if key.trim().is_empty() {
            return Err(Error::Config(format!(
                "API key is not configured (set api.key or {})",
                ENV_API_KEY
            )));
        }
        Ok(key)
    }

    /// Signing secret: environment override, then the config file; optional
    pub fn api_secret(&self) -> Option<String> {
        let secret = std::env::var(ENV_API_SECRET).unwrap_or_else(|_| self.api.secret.clone());
        if secret.trim().is_empty() {
            None
        } else {
            Some(secret)
        }
    }

    /// Cache directory as a path
    pub fn cache_dir(&self) -> PathBuf {
        PathBuf::from(&self.cache.dir)
    }

    /// Resolver options derived from the geocode section
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            include_address: self.geocode.include_address,
            request_delay: Duration::from_millis(self.geocode.request_delay_ms),
        }
    }

    /// Filter configuration derived from the filter section
    pub fn filter_config(&self) -> Result<FilterConfig> {
        Ok(FilterConfig {
            enable_filtering: self.filter.enabled,
            strength: Some(self.filter.strength.parse::<FilterStrength>()?),
            max_results: self.filter.max_results,
            min_relevance_score: self.filter.min_score,
        })
    }

    /// Discovery options derived from the search and filter sections
    pub fn discover_options(&self) -> Result<DiscoverOptions> {
        Ok(DiscoverOptions {
            radius: None,
            page_size: self.search.page_size,
            request_delay: Duration::from_millis(self.search.request_delay_ms),
            filter: self.filter_config()?,
        })
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key". Returns the value as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "provider"] => Some(self.api.provider.clone()),
            ["api", "key"] => Some(self.api.key.clone()),
            ["api", "secret"] => Some(self.api.secret.clone()),

            ["geocode", "include_address"] => Some(self.geocode.include_address.to_string()),
            ["geocode", "request_delay_ms"] => Some(self.geocode.request_delay_ms.to_string()),

            ["search", "page_size"] => Some(self.search.page_size.to_string()),
            ["search", "request_delay_ms"] => Some(self.search.request_delay_ms.to_string()),

            ["filter", "enabled"] => Some(self.filter.enabled.to_string()),
            ["filter", "strength"] => Some(self.filter.strength.clone()),
            ["filter", "max_results"] => Some(self.filter.max_results.to_string()),
            ["filter", "min_score"] => Some(self.filter.min_score.to_string()),

            ["cache", "dir"] => Some(self.cache.dir.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "provider"] => {
                if value != "amap" && value != "baidu" {
                    return Err(Error::Config(format!("Unknown provider: {}", value)));
                }
                self.api.provider = value.to_string();
            }
            ["api", "key"] => self.api.key = value.to_string(),
            ["api", "secret"] => self.api.secret = value.to_string(),

            ["geocode", "include_address"] => {
                self.geocode.include_address = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid boolean value: {}", value)))?;
            }
            ["geocode", "request_delay_ms"] => {
                self.geocode.request_delay_ms = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid delay value: {}", value)))?;
            }

            ["search", "page_size"] => {
                self.search.page_size = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid page size: {}", value)))?;
            }
            ["search", "request_delay_ms"] => {
                self.search.request_delay_ms = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid delay value: {}", value)))?;
            }

            ["filter", "enabled"] => {
                self.filter.enabled = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid boolean value: {}", value)))?;
            }
            ["filter", "strength"] => {
                value.parse::<FilterStrength>()?;
                self.filter.strength = value.to_string();
            }
            ["filter", "max_results"] => {
                self.filter.max_results = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid max results: {}", value)))?;
            }
            ["filter", "min_score"] => {
                self.filter.min_score = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid score value: {}", value)))?;
            }

            ["cache", "dir"] => self.cache.dir = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "api.provider",
            "api.key",
            "api.secret",
            "geocode.include_address",
            "geocode.request_delay_ms",
            "search.page_size",
            "search.request_delay_ms",
            "filter.enabled",
            "filter.strength",
            "filter.max_results",
            "filter.min_score",
            "cache.dir",
        ]
    }
}
