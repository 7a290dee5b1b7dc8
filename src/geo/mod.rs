//! Geocoding module
//!
//! Provides forward/reverse geocoding and device location behind two traits,
//! `GeoProvider` and `DeviceLocator`. Every call made through this module is
//! bounded by an explicit timeout.

pub mod ip_location;
pub mod memory;
pub mod nominatim;
pub mod pacing;

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Kind of a structured address component returned by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    StreetNumber,
    Route,
    Suburb,
    Locality,
    Region,
    Postcode,
    Country,
    /// ISO 3166-1 alpha-2 code, e.g. "nz"
    CountryCode,
}

/// A single named address component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub kind: ComponentKind,
    pub name: String,
}

/// A geocoding result as returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Location of the result
    pub location: Coordinate,
    /// Provider's single-line rendering of the address
    pub formatted_address: String,
    /// Structured components in provider order
    pub components: Vec<AddressComponent>,
}

impl ProviderResponse {
    /// Create a response with no components
    pub fn new(location: Coordinate, formatted_address: impl Into<String>) -> Self {
        Self {
            location,
            formatted_address: formatted_address.into(),
            components: Vec::new(),
        }
    }

    /// Append a component (builder style)
    pub fn with_component(mut self, kind: ComponentKind, name: impl Into<String>) -> Self {
        self.components.push(AddressComponent {
            kind,
            name: name.into(),
        });
        self
    }

    /// First component of the given kind, if any
    pub fn component(&self, kind: ComponentKind) -> Option<&str> {
        self.components
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.name.as_str())
    }
}

/// Trait for geocoding backends
pub trait GeoProvider: Send + Sync {
    /// Backend name (e.g., "nominatim", "memory")
    fn name(&self) -> &'static str;

    /// Geocode a free-text address to its best match
    fn forward_geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = std::result::Result<ProviderResponse, GeoError>> + Send;

    /// Reverse geocode a coordinate to a structured address
    fn reverse_geocode(
        &self,
        coord: Coordinate,
    ) -> impl Future<Output = std::result::Result<ProviderResponse, GeoError>> + Send;
}

/// Trait for current-location backends
pub trait DeviceLocator: Send + Sync {
    /// Acquire the caller's current location
    fn current_location(
        &self,
    ) -> impl Future<Output = std::result::Result<Coordinate, GeoError>> + Send;
}

/// Run a geocoding call under `limit`; an elapsed call is a provider outage
pub async fn geocode_within<F>(
    limit: Duration,
    call: F,
) -> std::result::Result<ProviderResponse, GeoError>
where
    F: Future<Output = std::result::Result<ProviderResponse, GeoError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GeoError::ProviderUnavailable(format!(
            "no response within {}ms",
            limit.as_millis()
        ))),
    }
}

/// Run a device-location call under `limit`
pub async fn locate_within<F>(limit: Duration, call: F) -> std::result::Result<Coordinate, GeoError>
where
    F: Future<Output = std::result::Result<Coordinate, GeoError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GeoError::Timeout),
    }
}

/// Geocoder selected at runtime
#[derive(Debug)]
pub enum Geocoder {
    Nominatim(nominatim::NominatimBackend),
    Memory(memory::MemoryGeocoder),
}

impl GeoProvider for Geocoder {
    fn name(&self) -> &'static str {
        match self {
            Self::Nominatim(b) => b.name(),
            Self::Memory(b) => b.name(),
        }
    }

    async fn forward_geocode(
        &self,
        query: &str,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        match self {
            Self::Nominatim(b) => b.forward_geocode(query).await,
            Self::Memory(b) => b.forward_geocode(query).await,
        }
    }

    async fn reverse_geocode(
        &self,
        coord: Coordinate,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        match self {
            Self::Nominatim(b) => b.reverse_geocode(coord).await,
            Self::Memory(b) => b.reverse_geocode(coord).await,
        }
    }
}

/// Build the geocoder named in the configuration
///
/// "memory" yields an empty in-process table (every lookup is NotFound),
/// which is only useful for offline smoke tests.
pub fn get_geocoder(config: &Config) -> Result<Geocoder> {
    match config.geocoder.backend.to_lowercase().as_str() {
        "nominatim" => Ok(Geocoder::Nominatim(nominatim::NominatimBackend::new(
            &config.geocoder,
        )?)),
        "memory" => Ok(Geocoder::Memory(memory::MemoryGeocoder::new())),
        other => Err(crate::error::Error::Config(format!(
            "Unknown geocoder backend: {}",
            other
        ))),
    }
}

/// Build the device locator from the configuration
pub fn get_device_locator(config: &Config) -> Result<ip_location::IpLocator> {
    ip_location::IpLocator::new(&config.device)
}
