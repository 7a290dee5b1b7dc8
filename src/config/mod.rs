//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/neighbourly/config.toml

pub mod defaults;

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Current-location settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Resolution cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Ranking settings
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Taxonomy source
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Backend name ("nominatim" or "memory")
    #[serde(default = "default_geocoder_backend")]
    pub backend: String,

    /// Provider base URL
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,

    /// Country addresses must lie in
    #[serde(default = "default_country")]
    pub country: String,

    /// Country code used to bias forward geocoding
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Language for provider place names (e.g. "en"); empty for the provider default
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum spacing between provider requests in milliseconds (0 = unpaced)
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
}

/// Current-location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// If false, current-location queries are refused
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// IP geolocation endpoint
    #[serde(default = "default_device_url")]
    pub base_url: String,

    /// Lookup timeout in seconds
    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
}

/// Resolution cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries (0 disables caching)
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,

    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

/// Ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Simultaneous centroid lookups
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Radius used when none is given (0 = no filtering)
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Estimate for unresolved neighbourhoods in the origin's region
    #[serde(default = "default_same_region_km")]
    pub estimated_same_region_km: f64,

    /// Estimate for unresolved neighbourhoods elsewhere
    #[serde(default = "default_other_region_km")]
    pub estimated_other_region_km: f64,
}

/// Taxonomy source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Path to a taxonomy TOML document; the built-in one when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_geocoder_backend() -> String {
    DEFAULT_GEOCODER_BACKEND.to_string()
}
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}
fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}
fn default_language() -> String {
    DEFAULT_GEOCODER_LANGUAGE.to_string()
}
fn default_min_interval() -> u64 {
    DEFAULT_GEOCODER_MIN_INTERVAL_MS
}
fn default_true() -> bool {
    true
}
fn default_device_url() -> String {
    DEFAULT_DEVICE_URL.to_string()
}
fn default_device_timeout() -> u64 {
    DEFAULT_DEVICE_TIMEOUT_SECS
}
fn default_cache_max_entries() -> u64 {
    DEFAULT_CACHE_MAX_ENTRIES
}
fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_same_region_km() -> f64 {
    DEFAULT_ESTIMATED_SAME_REGION_KM
}
fn default_other_region_km() -> f64 {
    DEFAULT_ESTIMATED_OTHER_REGION_KM
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: default_geocoder_backend(),
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
            country: default_country(),
            country_code: default_country_code(),
            language: default_language(),
            min_interval_ms: default_min_interval(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_device_url(),
            timeout_secs: default_device_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            default_radius_km: default_radius_km(),
            estimated_same_region_km: default_same_region_km(),
            estimated_other_region_km: default_other_region_km(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

fn parse_nonzero(key: &str, value: &str) -> Result<u64> {
    let n: u64 = parse_value(key, value)?;
    if n == 0 {
        return Err(Error::Config(format!("{} must be at least 1", key)));
    }
    Ok(n)
}

fn parse_km(key: &str, value: &str) -> Result<f64> {
    let km: f64 = parse_value(key, value)?;
    if !km.is_finite() || km < 0.0 {
        return Err(Error::Config(format!(
            "{} must be a non-negative distance, got {}",
            key, value
        )));
    }
    Ok(km)
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "backend"] => Some(self.geocoder.backend.clone()),
            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),
            ["geocoder", "country"] => Some(self.geocoder.country.clone()),
            ["geocoder", "country_code"] => Some(self.geocoder.country_code.clone()),
            ["geocoder", "language"] => Some(self.geocoder.language.clone()),
            ["geocoder", "min_interval_ms"] => Some(self.geocoder.min_interval_ms.to_string()),

            ["device", "enabled"] => Some(self.device.enabled.to_string()),
            ["device", "base_url"] => Some(self.device.base_url.clone()),
            ["device", "timeout_secs"] => Some(self.device.timeout_secs.to_string()),

            ["cache", "max_entries"] => Some(self.cache.max_entries.to_string()),
            ["cache", "ttl_secs"] => Some(self.cache.ttl_secs.to_string()),

            ["proximity", "concurrency"] => Some(self.proximity.concurrency.to_string()),
            ["proximity", "default_radius_km"] => {
                Some(self.proximity.default_radius_km.to_string())
            }
            ["proximity", "estimated_same_region_km"] => {
                Some(self.proximity.estimated_same_region_km.to_string())
            }
            ["proximity", "estimated_other_region_km"] => {
                Some(self.proximity.estimated_other_region_km.to_string())
            }

            ["taxonomy", "path"] => Some(self.taxonomy.path.clone().unwrap_or_default()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "backend"] => self.geocoder.backend = value.to_string(),
            ["geocoder", "base_url"] => self.geocoder.base_url = value.to_string(),
            ["geocoder", "user_agent"] => self.geocoder.user_agent = value.to_string(),
            ["geocoder", "timeout_secs"] => self.geocoder.timeout_secs = parse_nonzero(key, value)?,
            ["geocoder", "country"] => self.geocoder.country = value.to_string(),
            ["geocoder", "country_code"] => self.geocoder.country_code = value.to_string(),
            ["geocoder", "language"] => self.geocoder.language = value.trim().to_string(),
            ["geocoder", "min_interval_ms"] => {
                self.geocoder.min_interval_ms = parse_value(key, value)?
            }

            ["device", "enabled"] => self.device.enabled = parse_value(key, value)?,
            ["device", "base_url"] => self.device.base_url = value.to_string(),
            ["device", "timeout_secs"] => self.device.timeout_secs = parse_nonzero(key, value)?,

            ["cache", "max_entries"] => self.cache.max_entries = parse_value(key, value)?,
            ["cache", "ttl_secs"] => self.cache.ttl_secs = parse_nonzero(key, value)?,

            ["proximity", "concurrency"] => {
                let concurrency: usize = parse_value(key, value)?;
                if concurrency == 0 {
                    return Err(Error::Config(format!("{} must be at least 1", key)));
                }
                self.proximity.concurrency = concurrency;
            }
            ["proximity", "default_radius_km"] => {
                self.proximity.default_radius_km = parse_km(key, value)?
            }
            ["proximity", "estimated_same_region_km"] => {
                self.proximity.estimated_same_region_km = parse_km(key, value)?
            }
            ["proximity", "estimated_other_region_km"] => {
                self.proximity.estimated_other_region_km = parse_km(key, value)?
            }

            ["taxonomy", "path"] => {
                let path = value.trim();
                self.taxonomy.path = (!path.is_empty()).then(|| path.to_string());
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.backend",
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.timeout_secs",
            "geocoder.country",
            "geocoder.country_code",
            "geocoder.language",
            "geocoder.min_interval_ms",
            "device.enabled",
            "device.base_url",
            "device.timeout_secs",
            "cache.max_entries",
            "cache.ttl_secs",
            "proximity.concurrency",
            "proximity.default_radius_km",
            "proximity.estimated_same_region_km",
            "proximity.estimated_other_region_km",
            "taxonomy.path",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
