//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the Nominatim search and reverse APIs with address details enabled.
//! Rate limit: 1 request per second per client (a User-Agent is required),
//! enforced by a `RequestPacer` shared by every clone of the backend.
//! Place names are requested in the configured language; without one the
//! country comes back under its local name ("New Zealand / Aotearoa").

use crate::config::GeocoderConfig;
use crate::coord::Coordinate;
use crate::error::{GeoError, Result};
use crate::geo::pacing::RequestPacer;
use crate::geo::{ComponentKind, GeoProvider, ProviderResponse};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Nominatim address keys, in priority order, for each component kind
const COMPONENT_KEYS: &[(ComponentKind, &[&str])] = &[
    (ComponentKind::StreetNumber, &["house_number"]),
    (ComponentKind::Route, &["road", "pedestrian", "footway"]),
    (
        ComponentKind::Suburb,
        &["suburb", "neighbourhood", "quarter", "city_district", "hamlet"],
    ),
    (ComponentKind::Locality, &["city", "town", "village", "municipality"]),
    (ComponentKind::Region, &["state", "region", "province"]),
    (ComponentKind::Postcode, &["postcode"]),
    (ComponentKind::Country, &["country"]),
    (ComponentKind::CountryCode, &["country_code"]),
];

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    country_code: String,
    language: String,
    pacer: RequestPacer,
}

/// Nominatim search/reverse response item (jsonv2)
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: Option<String>,
    lon: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    address: HashMap<String, String>,
    /// Present instead of a result when reverse lookup finds nothing
    error: Option<String>,
}

impl NominatimBackend {
    /// Create a new Nominatim backend from geocoder settings
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country_code: config.country_code.to_lowercase(),
            language: config.language.trim().to_string(),
            pacer: RequestPacer::from_millis(config.min_interval_ms),
        })
    }

    /// Parse lat/lng strings to a coordinate
    fn parse_coords(lat: &str, lng: &str) -> std::result::Result<Coordinate, GeoError> {
        let lat: f64 = lat.parse().map_err(|_| {
            GeoError::ProviderUnavailable(format!("Invalid latitude in response: {}", lat))
        })?;
        let lng: f64 = lng.parse().map_err(|_| {
            GeoError::ProviderUnavailable(format!("Invalid longitude in response: {}", lng))
        })?;
        Ok(Coordinate::new(lat, lng))
    }

    /// Convert a Nominatim result into a provider response
    fn to_response(
        result: NominatimResult,
        query: &str,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        if result.error.is_some() {
            return Err(GeoError::NotFound(query.to_string()));
        }
        let (Some(lat), Some(lon)) = (result.lat.as_deref(), result.lon.as_deref()) else {
            return Err(GeoError::NotFound(query.to_string()));
        };
        let location = Self::parse_coords(lat, lon)?;

        let mut response =
            ProviderResponse::new(location, result.display_name.unwrap_or_default());
        for (kind, keys) in COMPONENT_KEYS {
            for key in keys.iter() {
                if let Some(value) = result.address.get(*key) {
                    response = response.with_component(*kind, value.clone());
                }
            }
        }
        Ok(response)
    }

    /// Issue a GET and map transport/status failures onto provider errors
    async fn fetch(&self, url: &str, query: &str) -> std::result::Result<reqwest::Response, GeoError> {
        self.pacer.ready().await;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GeoError::ProviderUnavailable(format!("Nominatim request failed: {}", e)))?;

        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => Err(GeoError::RateLimited),
            StatusCode::NOT_FOUND => Err(GeoError::NotFound(query.to_string())),
            s => Err(GeoError::ProviderUnavailable(format!(
                "Nominatim returned status: {}",
                s
            ))),
        }
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );
        if !self.country_code.is_empty() {
            url.push_str(&format!("&countrycodes={}", self.country_code));
        }
        self.with_language(url)
    }

    fn reverse_url(&self, coord: Coordinate) -> String {
        self.with_language(format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1",
            self.base_url, coord.lat, coord.lng
        ))
    }

    fn with_language(&self, mut url: String) -> String {
        if !self.language.is_empty() {
            url.push_str(&format!(
                "&accept-language={}",
                urlencoding::encode(&self.language)
            ));
        }
        url
    }
}

impl GeoProvider for NominatimBackend {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn forward_geocode(
        &self,
        query: &str,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        debug!(query, "nominatim forward geocode");
        let response = self.fetch(&self.search_url(query), query).await?;

        let results: Vec<NominatimResult> = response.json().await.map_err(|e| {
            GeoError::ProviderUnavailable(format!("Failed to parse Nominatim response: {}", e))
        })?;

        match results.into_iter().next() {
            Some(result) => Self::to_response(result, query),
            None => Err(GeoError::NotFound(query.to_string())),
        }
    }

    async fn reverse_geocode(
        &self,
        coord: Coordinate,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        debug!(%coord, "nominatim reverse geocode");
        let query = coord.to_string();
        let response = self.fetch(&self.reverse_url(coord), &query).await?;

        let result: NominatimResult = response.json().await.map_err(|e| {
            GeoError::ProviderUnavailable(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Self::to_response(result, &query)
    }
}
