//! Resolution cache
//!
//! Geocoding answers are cached by normalized query so repeated lookups do not
//! hit the provider. The cache is a trait so callers can inject their own
//! store or disable caching entirely.
//!
//! Keys carry a kind prefix:
//! - `reverse:` rounded coordinate -> `ParsedAddress`
//! - `forward:` normalized text -> `ParsedAddress`
//! - `point:` normalized text -> `Coordinate`

pub mod memory;

pub use memory::MemoryCache;

use crate::address::{normalize, ParsedAddress};
use crate::config::CacheConfig;
use crate::coord::Coordinate;
use std::sync::Arc;
use std::time::Duration;

/// A normalized cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for the address at a coordinate
    pub fn reverse(coord: Coordinate) -> Self {
        Self(format!("reverse:{}", coord.key()))
    }

    /// Key for the address of a free-text query
    pub fn forward(query: &str) -> Self {
        Self(format!("forward:{}", normalize(query)))
    }

    /// Key for the location of a free-text query
    pub fn point(query: &str) -> Self {
        Self(format!("point:{}", normalize(query)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached value
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Address(ParsedAddress),
    Coordinate(Coordinate),
}

impl CacheValue {
    pub fn into_address(self) -> Option<ParsedAddress> {
        match self {
            Self::Address(a) => Some(a),
            Self::Coordinate(_) => None,
        }
    }

    pub fn into_coordinate(self) -> Option<Coordinate> {
        match self {
            Self::Coordinate(c) => Some(c),
            Self::Address(_) => None,
        }
    }
}

/// Trait for resolution caches
///
/// Implementations must be safe to share between concurrent requests.
pub trait ResolutionCache: Send + Sync {
    /// Cache name (e.g., "memory", "none")
    fn name(&self) -> &'static str;

    /// Look up a live entry; expired entries are never returned
    fn get(&self, key: &CacheKey) -> Option<CacheValue>;

    /// Store a value, evicting the least recently used entry when full
    fn insert(&self, key: CacheKey, value: CacheValue);

    /// Number of live entries (may lag briefly behind inserts)
    fn len(&self) -> usize;

    /// Drop every entry
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResolutionCache for NoCache {
    fn name(&self) -> &'static str {
        "none"
    }

    fn get(&self, _key: &CacheKey) -> Option<CacheValue> {
        None
    }

    fn insert(&self, _key: CacheKey, _value: CacheValue) {}

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) {}
}

/// Build the cache described by the configuration
///
/// A zero capacity disables caching.
pub fn get_cache(config: &CacheConfig) -> Arc<dyn ResolutionCache> {
    if config.max_entries == 0 {
        Arc::new(NoCache)
    } else {
        Arc::new(MemoryCache::new(
            config.max_entries,
            Duration::from_secs(config.ttl_secs),
        ))
    }
}
