//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api;

/// Default geocoding backend
pub const DEFAULT_GEOCODER_BACKEND: &str = "nominatim";

/// Default geocoding provider base URL
pub const DEFAULT_GEOCODER_URL: &str = api::NOMINATIM_URL;

/// Default per-call provider timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 8;

/// Language requested for provider place names
pub const DEFAULT_GEOCODER_LANGUAGE: &str = "en";

/// Minimum spacing between provider requests (Nominatim allows 1 per second)
pub const DEFAULT_GEOCODER_MIN_INTERVAL_MS: u64 = 1000;

/// Country every resolved address must lie in
pub const DEFAULT_COUNTRY: &str = "New Zealand";

/// ISO 3166-1 code used to bias forward geocoding
pub const DEFAULT_COUNTRY_CODE: &str = "nz";

/// Default device-location endpoint
pub const DEFAULT_DEVICE_URL: &str = api::IP_API_URL;

/// Default device-location timeout in seconds
pub const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 5;

/// Maximum cached geocoding answers (0 disables the cache)
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

/// Lifetime of a cached answer in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Simultaneous centroid lookups during ranking
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default search radius in kilometres (0 = no filtering)
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Estimated distance for an unresolved neighbourhood in the origin's region
pub const DEFAULT_ESTIMATED_SAME_REGION_KM: f64 = 5.0;

/// Estimated distance for an unresolved neighbourhood elsewhere
pub const DEFAULT_ESTIMATED_OTHER_REGION_KM: f64 = 100.0;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "neighbourly";
