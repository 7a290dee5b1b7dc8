//! Centralized constants for the neighbourly crate
//!
//! Values shared by more than one module live here so they stay consistent.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;

    /// Decimal places kept when a coordinate is used as a cache key (~1 m)
    pub const COORDINATE_KEY_PRECISION: usize = 5;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to geocoding providers (Nominatim requires one)
    pub const USER_AGENT: &str = concat!("neighbourly/", env!("CARGO_PKG_VERSION"));
}

/// Proximity fallback estimates
pub mod proximity {
    /// Margin added to the radius when an unresolved candidate lies in another region
    pub const OUT_OF_RADIUS_MARGIN_KM: f64 = 1.0;
}
