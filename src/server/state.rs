//! Server shared state
//!
//! Holds configuration and the resolution service for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::service::{self, DefaultService};

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration the service was built from
    pub config: Config,

    /// Resolution service shared by every request
    pub service: DefaultService,
}

impl AppState {
    /// Create application state, building the service from `config`
    ///
    /// Fails when the taxonomy or the geocoder cannot be set up.
    pub fn new(config: Config) -> Result<Self> {
        let service = service::build(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// Create application state around an existing service
    pub fn with_service(config: Config, service: DefaultService) -> Self {
        Self { config, service }
    }

    /// Radius applied when a request names none
    pub fn default_radius_km(&self) -> f64 {
        self.config.proximity.default_radius_km
    }
}
