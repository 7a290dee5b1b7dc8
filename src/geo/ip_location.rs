//! IP-based current location
//!
//! Uses ip-api.com to approximate the caller's position. Operators can turn
//! location access off entirely, in which case every lookup is denied.

use crate::config::DeviceConfig;
use crate::coord::Coordinate;
use crate::error::{GeoError, Result};
use crate::geo::DeviceLocator;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// IP location service
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
    enabled: bool,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocator {
    /// Create a new IP locator from device settings
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.base_url.clone(),
            enabled: config.enabled,
        })
    }

    /// Whether location access is allowed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn an ip-api.com payload into a coordinate
    fn to_coordinate(data: IpApiResponse) -> std::result::Result<Coordinate, GeoError> {
        if data.status != "success" {
            return Err(GeoError::Unavailable(
                data.message
                    .unwrap_or_else(|| "IP location lookup failed".to_string()),
            ));
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)),
            _ => Err(GeoError::Unavailable(
                "No coordinates in IP location response".to_string(),
            )),
        }
    }
}

impl DeviceLocator for IpLocator {
    async fn current_location(&self) -> std::result::Result<Coordinate, GeoError> {
        if !self.enabled {
            return Err(GeoError::PermissionDenied);
        }

        debug!(url = %self.url, "ip location lookup");
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeoError::Timeout
            } else {
                GeoError::Unavailable(format!("IP location request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(GeoError::Unavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            GeoError::Unavailable(format!("Failed to parse IP location response: {}", e))
        })?;

        Self::to_coordinate(data)
    }
}
