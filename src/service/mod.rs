//! Geo-resolution service
//!
//! The public entry point. Resolves a location query to the neighbourhood
//! that contains it, or to every neighbourhood ranked by distance from it.
//!
//! Each operation has two forms: `try_*` returns a `ResolveError` saying why
//! nothing was found, the plain form logs that reason and returns an empty
//! answer.

use crate::address::{self, ParsedAddress};
use crate::cache::{get_cache, CacheKey, CacheValue, ResolutionCache};
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, GeoError, ResolveError, Result};
use crate::geo::ip_location::IpLocator;
use crate::geo::{
    geocode_within, get_device_locator, get_geocoder, locate_within, DeviceLocator, GeoProvider,
    Geocoder,
};
use crate::matcher::match_address;
use crate::proximity::{Origin, ProximityEngine, ProximitySettings, ResolvedNeighbourhood};
use crate::taxonomy::{NeighbourhoodEntry, Taxonomy};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Keyword that asks for the device's current location
pub const CURRENT_LOCATION: &str = "here";

/// A location as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinate(Coordinate),
    /// Free-text locality hint, e.g. "Ponsonby, Auckland"
    Text(String),
    CurrentLocation,
}

impl LocationQuery {
    /// "lat,lng" is a coordinate, "here" the current location, anything else text
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case(CURRENT_LOCATION) {
            return Self::CurrentLocation;
        }
        match input.parse::<Coordinate>() {
            Ok(coord) => Self::Coordinate(coord),
            Err(_) => Self::Text(input.to_string()),
        }
    }
}

impl FromStr for LocationQuery {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coordinate(c) => write!(f, "{},{}", c.lat, c.lng),
            Self::Text(t) => write!(f, "{}", t),
            Self::CurrentLocation => write!(f, "{}", CURRENT_LOCATION),
        }
    }
}

/// Service over the configured geocoder and the IP locator
pub type DefaultService = GeoResolutionService<Geocoder, IpLocator>;

/// Build the service described by the configuration
pub fn build(config: &Config) -> Result<DefaultService> {
    GeoResolutionService::from_config(config, get_geocoder(config)?, get_device_locator(config)?)
}

/// Neighbourhood resolution over a geocoder and a device locator
pub struct GeoResolutionService<P, D> {
    provider: Arc<P>,
    locator: D,
    taxonomy: Arc<Taxonomy>,
    cache: Arc<dyn ResolutionCache>,
    engine: ProximityEngine<P>,
    country: String,
    country_code: String,
    geocode_timeout: Duration,
    device_timeout: Duration,
}

impl<P: GeoProvider, D: DeviceLocator> GeoResolutionService<P, D> {
    pub fn new(
        provider: Arc<P>,
        locator: D,
        taxonomy: Arc<Taxonomy>,
        cache: Arc<dyn ResolutionCache>,
        settings: ProximitySettings,
    ) -> Self {
        let country = settings.country.clone();
        let country_code = settings.country_code.clone();
        let geocode_timeout = settings.timeout;
        let engine = ProximityEngine::new(provider.clone(), cache.clone(), settings);
        Self {
            provider,
            locator,
            taxonomy,
            cache,
            engine,
            country,
            country_code,
            geocode_timeout,
            device_timeout: geocode_timeout,
        }
    }

    /// Build a service with the configured taxonomy, cache and tuning
    pub fn from_config(config: &Config, provider: P, locator: D) -> Result<Self> {
        let taxonomy = Taxonomy::from_config(&config.taxonomy)?;
        info!(
            geocoder = provider.name(),
            neighbourhoods = taxonomy.len(),
            "resolution service ready"
        );
        Ok(Self::new(
            Arc::new(provider),
            locator,
            Arc::new(taxonomy),
            get_cache(&config.cache),
            ProximitySettings::from_config(config),
        )
        .with_device_timeout(Duration::from_secs(config.device.timeout_secs)))
    }

    /// Bound device-location lookups by `timeout`
    pub fn with_device_timeout(mut self, timeout: Duration) -> Self {
        self.device_timeout = timeout;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn cache(&self) -> &dyn ResolutionCache {
        self.cache.as_ref()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Country addresses must lie in to resolve
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The neighbourhood containing `query`, or None
    pub async fn resolve_neighbourhood(&self, query: &LocationQuery) -> Option<ResolvedNeighbourhood> {
        match self.try_resolve_neighbourhood(query).await {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                log_failure("resolve", query, &e);
                None
            }
        }
    }

    /// The neighbourhood containing `query`, or why there is none
    pub async fn try_resolve_neighbourhood(
        &self,
        query: &LocationQuery,
    ) -> std::result::Result<ResolvedNeighbourhood, ResolveError> {
        let address = match query {
            LocationQuery::Coordinate(coord) => {
                check_point(*coord)?;
                self.reverse(*coord).await?
            }
            LocationQuery::Text(text) => self.forward(text).await?.0,
            LocationQuery::CurrentLocation => {
                let here = self.current_location().await?;
                self.reverse(here).await?
            }
        };

        let entry = self.classify(&address)?;
        debug!(query = %query, neighbourhood = %entry.id, "resolved neighbourhood");
        Ok(ResolvedNeighbourhood::exact(entry.clone(), 0.0))
    }

    /// Neighbourhoods ranked by distance from `query`; empty on failure
    pub async fn find_nearby(
        &self,
        query: &LocationQuery,
        radius_km: Option<f64>,
    ) -> Vec<ResolvedNeighbourhood> {
        match self.try_find_nearby(query, radius_km).await {
            Ok(ranked) => ranked,
            Err(e) => {
                log_failure("nearby", query, &e);
                Vec::new()
            }
        }
    }

    /// Neighbourhoods ranked by distance from `query`
    ///
    /// Only locating the query itself can fail; candidates whose centroid
    /// cannot be resolved come back estimated.
    pub async fn try_find_nearby(
        &self,
        query: &LocationQuery,
        radius_km: Option<f64>,
    ) -> std::result::Result<Vec<ResolvedNeighbourhood>, ResolveError> {
        let origin = self.origin(query).await?;
        Ok(self
            .engine
            .rank(&origin, self.taxonomy.all_entries(), radius_km)
            .await)
    }

    /// Unranked listing of one region (by key or either name), or of everything
    pub fn browse_region(&self, region: Option<&str>) -> Vec<ResolvedNeighbourhood> {
        self.taxonomy
            .all_entries()
            .iter()
            .filter(|entry| region.map_or(true, |r| entry.in_region(r)))
            .cloned()
            .map(ResolvedNeighbourhood::unranked)
            .collect()
    }

    fn classify(&self, address: &ParsedAddress) -> std::result::Result<&NeighbourhoodEntry, ResolveError> {
        if !address.is_domestic(&self.country, &self.country_code) {
            return Err(ResolveError::OutOfTerritory {
                country: address.country.clone(),
            });
        }
        match_address(&self.taxonomy, address).ok_or_else(|| ResolveError::NoMatch {
            suburb: address.suburb.clone(),
        })
    }

    async fn origin(&self, query: &LocationQuery) -> std::result::Result<Origin, ResolveError> {
        match query {
            LocationQuery::Coordinate(coord) => {
                check_point(*coord)?;
                Ok(self.origin_at(*coord).await)
            }
            LocationQuery::Text(text) => {
                let (address, point) = self.forward(text).await?;
                Ok(Origin::new(point).with_region(region_of(&address)))
            }
            LocationQuery::CurrentLocation => {
                let here = self.current_location().await?;
                Ok(self.origin_at(here).await)
            }
        }
    }

    /// Origin at a known point; the region lookup is best effort
    async fn origin_at(&self, point: Coordinate) -> Origin {
        match self.reverse(point).await {
            Ok(address) => Origin::new(point).with_region(region_of(&address)),
            Err(e) => {
                debug!(kind = e.kind(), point = %point, "origin region unknown");
                Origin::new(point)
            }
        }
    }

    async fn reverse(&self, coord: Coordinate) -> std::result::Result<ParsedAddress, ResolveError> {
        let key = CacheKey::reverse(coord);
        if let Some(address) = self.cache.get(&key).and_then(CacheValue::into_address) {
            return Ok(address);
        }

        let response =
            geocode_within(self.geocode_timeout, self.provider.reverse_geocode(coord)).await?;
        let address = address::parse(&response);
        self.cache.insert(key, CacheValue::Address(address.clone()));
        Ok(address)
    }

    async fn forward(
        &self,
        text: &str,
    ) -> std::result::Result<(ParsedAddress, Coordinate), ResolveError> {
        if text.trim().is_empty() {
            return Err(GeoError::NotFound(String::new()).into());
        }

        let address_key = CacheKey::forward(text);
        let point_key = CacheKey::point(text);
        let cached_address = self.cache.get(&address_key).and_then(CacheValue::into_address);
        let cached_point = self.cache.get(&point_key).and_then(CacheValue::into_coordinate);
        if let (Some(address), Some(point)) = (cached_address, cached_point) {
            return Ok((address, point));
        }

        let response =
            geocode_within(self.geocode_timeout, self.provider.forward_geocode(text)).await?;
        let address = address::parse(&response);
        self.cache
            .insert(address_key, CacheValue::Address(address.clone()));
        self.cache
            .insert(point_key, CacheValue::Coordinate(response.location));
        Ok((address, response.location))
    }

    async fn current_location(&self) -> std::result::Result<Coordinate, ResolveError> {
        let here = locate_within(self.device_timeout, self.locator.current_location()).await?;
        check_point(here)?;
        Ok(here)
    }
}

fn check_point(coord: Coordinate) -> std::result::Result<(), ResolveError> {
    coord.validate().map_err(|e| match e {
        Error::InvalidCoordinates(msg) => ResolveError::InvalidCoordinates(msg),
        other => ResolveError::InvalidCoordinates(other.to_string()),
    })
}

/// Region used to compare an origin with candidates
fn region_of(address: &ParsedAddress) -> String {
    if address.region.trim().is_empty() {
        address.city.clone()
    } else {
        address.region.clone()
    }
}

fn log_failure(operation: &str, query: &LocationQuery, error: &ResolveError) {
    match error {
        ResolveError::OutOfTerritory { .. } | ResolveError::NoMatch { .. } => {
            debug!(operation, query = %query, kind = error.kind(), "{}", error)
        }
        _ => warn!(operation, query = %query, kind = error.kind(), "{}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, NoCache};
    use crate::geo::memory::{FixedLocator, MemoryGeocoder};
    use crate::geo::{ComponentKind, ProviderResponse};
    use crate::proximity::Confidence;

    const PONSONBY: Coordinate = Coordinate {
        lat: -36.856,
        lng: 174.7445,
    };
    const SYDNEY: Coordinate = Coordinate {
        lat: -33.8688,
        lng: 151.2093,
    };

    fn ponsonby_response() -> ProviderResponse {
        ProviderResponse::new(PONSONBY, "Ponsonby Road, Ponsonby, Auckland, 1011, New Zealand")
            .with_component(ComponentKind::Route, "Ponsonby Road")
            .with_component(ComponentKind::Suburb, "Ponsonby")
            .with_component(ComponentKind::Locality, "Auckland")
            .with_component(ComponentKind::Region, "Auckland")
            .with_component(ComponentKind::Country, "New Zealand")
    }

    fn sydney_response() -> ProviderResponse {
        ProviderResponse::new(SYDNEY, "Sydney NSW 2000, Australia")
            .with_component(ComponentKind::Suburb, "Sydney")
            .with_component(ComponentKind::Locality, "Sydney")
            .with_component(ComponentKind::Country, "Australia")
    }

    /// Answers every built-in centroid query, spreading them south of Ponsonby
    fn with_centroids(geocoder: MemoryGeocoder, taxonomy: &Taxonomy) -> MemoryGeocoder {
        taxonomy
            .all_entries()
            .iter()
            .enumerate()
            .fold(geocoder, |g, (i, entry)| {
                let query = format!("{}, {}, New Zealand", entry.suburbs[0], entry.region);
                let point = Coordinate::new(PONSONBY.lat - 0.01 * (i as f64 + 1.0), PONSONBY.lng);
                g.with_forward(&query, ProviderResponse::new(point, query.clone()))
            })
    }

    fn service(
        geocoder: Arc<MemoryGeocoder>,
        locator: FixedLocator,
        cache: Arc<dyn ResolutionCache>,
    ) -> GeoResolutionService<MemoryGeocoder, FixedLocator> {
        GeoResolutionService::new(
            geocoder,
            locator,
            Arc::new(Taxonomy::builtin().unwrap()),
            cache,
            ProximitySettings::default(),
        )
    }

    fn default_geocoder() -> MemoryGeocoder {
        MemoryGeocoder::new()
            .with_reverse(PONSONBY, ponsonby_response())
            .with_reverse(SYDNEY, sydney_response())
            .with_forward("Ponsonby, Auckland", ponsonby_response())
    }

    fn nowhere() -> FixedLocator {
        FixedLocator::failing(GeoError::Unavailable("no device".to_string()))
    }

    #[test]
    fn test_parse_location_query() {
        assert_eq!(
            "-36.856, 174.7445".parse::<LocationQuery>().unwrap(),
            LocationQuery::Coordinate(PONSONBY)
        );
        assert_eq!(
            " HERE ".parse::<LocationQuery>().unwrap(),
            LocationQuery::CurrentLocation
        );
        assert_eq!(
            "Ponsonby, Auckland".parse::<LocationQuery>().unwrap(),
            LocationQuery::Text("Ponsonby, Auckland".to_string())
        );
        assert_eq!(LocationQuery::parse("here"), LocationQuery::CurrentLocation);
        assert_eq!(LocationQuery::Coordinate(PONSONBY).to_string(), "-36.856,174.7445");
    }

    #[test]
    fn test_build_from_config() {
        let mut config = Config::default();
        config.geocoder.backend = "memory".to_string();
        let service = build(&config).unwrap();
        assert_eq!(service.provider_name(), "memory");
        assert_eq!(service.cache().name(), "memory");

        config.geocoder.backend = "bogus".to_string();
        assert!(build(&config).is_err());
    }

    #[tokio::test]
    async fn test_resolve_coordinate_in_ponsonby() {
        let service = service(Arc::new(default_geocoder()), nowhere(), Arc::new(NoCache));

        let resolved = service
            .resolve_neighbourhood(&LocationQuery::Coordinate(PONSONBY))
            .await
            .unwrap();
        assert_eq!(resolved.entry.name, "Central Auckland");
        assert_eq!(resolved.distance_km, Some(0.0));
        assert_eq!(resolved.confidence, Confidence::Exact);
    }

    #[tokio::test]
    async fn test_resolve_text_query() {
        let service = service(Arc::new(default_geocoder()), nowhere(), Arc::new(NoCache));
        let resolved = service
            .resolve_neighbourhood(&LocationQuery::Text("ponsonby,  auckland".to_string()))
            .await
            .unwrap();
        assert_eq!(resolved.entry.id, "auckland/central");
    }

    #[tokio::test]
    async fn test_localized_country_name_resolves_by_code() {
        let response = ProviderResponse::new(
            PONSONBY,
            "Ponsonby Road, Ponsonby, Auckland, 1011, New Zealand / Aotearoa",
        )
        .with_component(ComponentKind::Route, "Ponsonby Road")
        .with_component(ComponentKind::Suburb, "Ponsonby")
        .with_component(ComponentKind::Locality, "Auckland")
        .with_component(ComponentKind::Country, "New Zealand / Aotearoa")
        .with_component(ComponentKind::CountryCode, "nz");
        let geocoder = MemoryGeocoder::new().with_reverse(PONSONBY, response);
        let service = service(Arc::new(geocoder), nowhere(), Arc::new(NoCache));

        let resolved = service
            .try_resolve_neighbourhood(&LocationQuery::Coordinate(PONSONBY))
            .await
            .unwrap();
        assert_eq!(resolved.entry.id, "auckland/central");
    }

    #[tokio::test]
    async fn test_address_without_suburb_resolves_to_none() {
        let at = Coordinate::new(-37.5, 175.0);
        let geocoder = MemoryGeocoder::new().with_reverse(
            at,
            ProviderResponse::new(at, "New Zealand")
                .with_component(ComponentKind::Country, "New Zealand"),
        );
        let service = service(Arc::new(geocoder), nowhere(), Arc::new(NoCache));
        let query = LocationQuery::Coordinate(at);

        assert!(service.resolve_neighbourhood(&query).await.is_none());
        let err = service.try_resolve_neighbourhood(&query).await.unwrap_err();
        assert_eq!(err.kind(), "no_match");
    }

    #[tokio::test]
    async fn test_foreign_address_is_out_of_territory() {
        let service = service(Arc::new(default_geocoder()), nowhere(), Arc::new(NoCache));
        let query = LocationQuery::Coordinate(SYDNEY);

        // "Sydney" would otherwise only fail to match; the country check comes first
        assert!(service.resolve_neighbourhood(&query).await.is_none());
        let err = service.try_resolve_neighbourhood(&query).await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::OutOfTerritory {
                country: "Australia".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let geocoder =
            MemoryGeocoder::new().with_reverse_error(PONSONBY, GeoError::RateLimited);
        let service = service(Arc::new(geocoder), nowhere(), Arc::new(NoCache));
        let query = LocationQuery::Coordinate(PONSONBY);

        assert!(service.resolve_neighbourhood(&query).await.is_none());
        let err = service.try_resolve_neighbourhood(&query).await.unwrap_err();
        assert_eq!(err.kind(), "rate_limited");
    }

    #[tokio::test]
    async fn test_invalid_coordinate_never_reaches_provider() {
        let geocoder = Arc::new(default_geocoder());
        let service = service(geocoder.clone(), nowhere(), Arc::new(NoCache));
        let query = LocationQuery::Coordinate(Coordinate::new(120.0, 0.0));

        let err = service.try_resolve_neighbourhood(&query).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_coordinates");
        assert!(service.find_nearby(&query, None).await.is_empty());
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_not_found() {
        let geocoder = Arc::new(default_geocoder());
        let service = service(geocoder.clone(), nowhere(), Arc::new(NoCache));
        let err = service
            .try_resolve_neighbourhood(&LocationQuery::Text("   ".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_current_location() {
        let service = service(
            Arc::new(default_geocoder()),
            FixedLocator::at(PONSONBY),
            Arc::new(NoCache),
        );
        let resolved = service
            .resolve_neighbourhood(&LocationQuery::CurrentLocation)
            .await
            .unwrap();
        assert_eq!(resolved.entry.id, "auckland/central");
    }

    #[tokio::test]
    async fn test_current_location_denied() {
        let service = service(
            Arc::new(default_geocoder()),
            FixedLocator::failing(GeoError::PermissionDenied),
            Arc::new(NoCache),
        );
        let err = service
            .try_resolve_neighbourhood(&LocationQuery::CurrentLocation)
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::Geo(GeoError::PermissionDenied));
        assert!(service
            .find_nearby(&LocationQuery::CurrentLocation, None)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_repeat_resolve_is_served_from_cache() {
        let geocoder = Arc::new(default_geocoder());
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(60)));
        let service = service(geocoder.clone(), nowhere(), cache);

        let text = LocationQuery::Text("Ponsonby, Auckland".to_string());
        let coord = LocationQuery::Coordinate(PONSONBY);
        service.resolve_neighbourhood(&text).await.unwrap();
        service.resolve_neighbourhood(&coord).await.unwrap();
        assert_eq!(geocoder.call_count(), 2);

        service.resolve_neighbourhood(&text).await.unwrap();
        service.resolve_neighbourhood(&coord).await.unwrap();
        assert_eq!(geocoder.call_count(), 2);
    }

    #[tokio::test]
    async fn test_find_nearby_ranks_whole_taxonomy() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let geocoder = with_centroids(default_geocoder(), &taxonomy);
        let service = service(Arc::new(geocoder), nowhere(), Arc::new(NoCache));

        let ranked = service
            .find_nearby(&LocationQuery::Coordinate(PONSONBY), None)
            .await;
        assert_eq!(ranked.len(), taxonomy.len());
        assert!(ranked.iter().all(|n| n.confidence == Confidence::Exact));
        assert_eq!(ranked[0].entry.id, taxonomy.all_entries()[0].id);

        // Centroids sit about 1.1 km apart heading south
        let near = service
            .find_nearby(&LocationQuery::Text("Ponsonby, Auckland".to_string()), Some(4.0))
            .await;
        assert_eq!(near.len(), 3);
        assert!(near.iter().all(|n| n.distance_km.unwrap() <= 4.0));
    }

    #[tokio::test]
    async fn test_repeat_find_nearby_makes_no_provider_calls() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let geocoder = Arc::new(with_centroids(default_geocoder(), &taxonomy));
        let cache = Arc::new(MemoryCache::new(1000, Duration::from_secs(60)));
        let service = service(geocoder.clone(), nowhere(), cache);
        let query = LocationQuery::Coordinate(PONSONBY);

        let first = service.find_nearby(&query, Some(5.0)).await;
        let calls = geocoder.call_count();
        assert_eq!(calls, taxonomy.len() + 1);

        let second = service.find_nearby(&query, Some(5.0)).await;
        assert_eq!(geocoder.call_count(), calls);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unresolved_origin_region_still_ranks() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let at = Coordinate::new(-36.9, 174.75);
        let geocoder = with_centroids(MemoryGeocoder::new(), &taxonomy);
        let service = service(Arc::new(geocoder), nowhere(), Arc::new(NoCache));

        let ranked = service
            .try_find_nearby(&LocationQuery::Coordinate(at), None)
            .await
            .unwrap();
        assert_eq!(ranked.len(), taxonomy.len());
    }

    #[tokio::test]
    async fn test_dropping_the_call_cancels_lookups() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let geocoder = Arc::new(
            with_centroids(default_geocoder(), &taxonomy).with_latency(Duration::from_millis(200)),
        );
        let service = service(geocoder.clone(), nowhere(), Arc::new(NoCache));

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            service.find_nearby(&LocationQuery::Coordinate(PONSONBY), None),
        )
        .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(geocoder.call_count() >= 1);
        assert_eq!(geocoder.completed_count(), 0);
    }

    #[test]
    fn test_browse_region() {
        let service = service(Arc::new(MemoryGeocoder::new()), nowhere(), Arc::new(NoCache));

        let wellington = service.browse_region(Some("Te Whanganui-a-Tara"));
        assert_eq!(wellington.len(), 4);
        assert!(wellington.iter().all(|n| n.distance_km.is_none()));
        assert!(wellington.iter().all(|n| n.entry.region_key == "wellington"));

        assert_eq!(service.browse_region(None).len(), service.taxonomy().len());
        assert!(service.browse_region(Some("otago")).is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.cache.max_entries = 0;
        let service =
            GeoResolutionService::from_config(&config, MemoryGeocoder::new(), nowhere()).unwrap();
        assert_eq!(service.provider_name(), "memory");
        assert_eq!(service.cache().name(), "none");
        assert_eq!(service.country(), "New Zealand");
    }
}
