//! Error types for neighbourly

use thiserror::Error;

/// Failures reported by geocoding and device-location providers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Geocoding provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Geocoding provider rate limit exceeded")]
    RateLimited,

    #[error("No geocoding result for '{0}'")]
    NotFound(String),

    #[error("Location access denied")]
    PermissionDenied,

    #[error("Device location unavailable: {0}")]
    Unavailable(String),

    #[error("Device location timed out")]
    Timeout,
}

impl GeoError {
    /// Stable label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::RateLimited => "rate_limited",
            Self::NotFound(_) => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Unavailable(_) => "unavailable",
            Self::Timeout => "timeout",
        }
    }
}

/// Why a query produced no neighbourhood
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("Address is outside the supported territory (country: '{country}')")]
    OutOfTerritory { country: String },

    #[error("No neighbourhood matches suburb '{suburb}'")]
    NoMatch { suburb: String },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

impl ResolveError {
    /// Stable label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Geo(e) => e.kind(),
            Self::OutOfTerritory { .. } => "out_of_territory",
            Self::NoMatch { .. } => "no_match",
            Self::InvalidCoordinates(_) => "invalid_coordinates",
        }
    }
}

/// Main error type for neighbourly operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type alias for neighbourly operations
pub type Result<T> = std::result::Result<T, Error>;
