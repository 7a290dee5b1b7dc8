//! Proximity ranking
//!
//! Ranks candidate neighbourhoods by great-circle distance from an origin.
//! Each candidate's representative point (its centroid) is resolved on demand
//! by forward geocoding its first suburb, through the cache. Lookups run as a
//! bounded batch; a candidate whose centroid cannot be resolved is kept with
//! an estimated distance instead of being dropped.

use crate::cache::{CacheKey, CacheValue, ResolutionCache};
use crate::config::Config;
use crate::constants::proximity::OUT_OF_RADIUS_MARGIN_KM;
use crate::coord::{haversine_km, Coordinate};
use crate::error::{Error, GeoError, Result};
use crate::geo::{geocode_within, GeoProvider};
use crate::taxonomy::NeighbourhoodEntry;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Whether a distance came from a resolved centroid or a heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Exact,
    Estimated,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Estimated => write!(f, "estimated"),
        }
    }
}

/// A neighbourhood with its distance from the query origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNeighbourhood {
    #[serde(flatten)]
    pub entry: NeighbourhoodEntry,
    /// None only for unranked listings
    pub distance_km: Option<f64>,
    pub confidence: Confidence,
}

impl ResolvedNeighbourhood {
    pub fn exact(entry: NeighbourhoodEntry, distance_km: f64) -> Self {
        Self {
            entry,
            distance_km: Some(distance_km),
            confidence: Confidence::Exact,
        }
    }

    pub fn estimated(entry: NeighbourhoodEntry, distance_km: f64) -> Self {
        Self {
            entry,
            distance_km: Some(distance_km),
            confidence: Confidence::Estimated,
        }
    }

    /// Listing without a distance
    pub fn unranked(entry: NeighbourhoodEntry) -> Self {
        Self {
            entry,
            distance_km: None,
            confidence: Confidence::Exact,
        }
    }

    pub fn is_estimated(&self) -> bool {
        self.confidence == Confidence::Estimated
    }
}

/// Reference point for a ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub point: Coordinate,
    /// Region the point lies in, when known
    pub region: Option<String>,
}

impl Origin {
    pub fn new(point: Coordinate) -> Self {
        Self {
            point,
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = (!region.trim().is_empty()).then_some(region);
        self
    }
}

/// Tuning for the proximity engine
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySettings {
    /// Maximum simultaneous centroid lookups
    pub concurrency: usize,
    /// Country appended to centroid queries
    pub country: String,
    /// ISO code of `country`, used for the territory check
    pub country_code: String,
    /// Per-lookup provider timeout
    pub timeout: Duration,
    /// Estimate for an unresolved candidate in the origin's region
    pub estimated_same_region_km: f64,
    /// Estimate for an unresolved candidate elsewhere, with no radius set
    pub estimated_other_region_km: f64,
}

impl ProximitySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.proximity.concurrency,
            country: config.geocoder.country.clone(),
            country_code: config.geocoder.country_code.clone(),
            timeout: Duration::from_secs(config.geocoder.timeout_secs),
            estimated_same_region_km: config.proximity.estimated_same_region_km,
            estimated_other_region_km: config.proximity.estimated_other_region_km,
        }
    }
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Check a user-supplied radius
///
/// Zero means "no filtering"; negative and non-finite values are rejected.
pub fn validate_radius(radius_km: Option<f64>) -> Result<Option<f64>> {
    match radius_km {
        Some(r) if !r.is_finite() || r < 0.0 => Err(Error::InvalidRadius(format!(
            "Radius must be a non-negative number of kilometres, got {}",
            r
        ))),
        other => Ok(other),
    }
}

/// Radius that actually filters, if any
fn active_radius(radius_km: Option<f64>) -> Option<f64> {
    radius_km.filter(|r| r.is_finite() && *r > 0.0)
}

/// Distance ranking over a geocoding provider
pub struct ProximityEngine<P> {
    provider: Arc<P>,
    cache: Arc<dyn ResolutionCache>,
    settings: ProximitySettings,
}

impl<P: GeoProvider> ProximityEngine<P> {
    pub fn new(provider: Arc<P>, cache: Arc<dyn ResolutionCache>, settings: ProximitySettings) -> Self {
        Self {
            provider,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ProximitySettings {
        &self.settings
    }

    /// Rank `candidates` by distance from `origin`
    ///
    /// With an active radius, entries farther than the radius are dropped.
    /// The result is sorted ascending; equal distances keep candidate order.
    pub async fn rank(
        &self,
        origin: &Origin,
        candidates: &[NeighbourhoodEntry],
        radius_km: Option<f64>,
    ) -> Vec<ResolvedNeighbourhood> {
        let radius = active_radius(radius_km);
        let concurrency = self.settings.concurrency.max(1);

        let lookups: Vec<_> = candidates
            .iter()
            .map(|entry| self.measure(origin, entry, radius))
            .collect();
        let mut ranked: Vec<ResolvedNeighbourhood> = stream::iter(lookups)
            .buffered(concurrency)
            .collect()
            .await;

        if let Some(radius) = radius {
            ranked.retain(|n| n.distance_km.is_some_and(|d| d <= radius));
        }
        ranked.sort_by(|a, b| {
            let a = a.distance_km.unwrap_or(f64::INFINITY);
            let b = b.distance_km.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });

        debug!(
            candidates = candidates.len(),
            ranked = ranked.len(),
            radius_km = ?radius,
            "ranked neighbourhoods"
        );
        ranked
    }

    /// Free-text query used to locate a neighbourhood
    pub fn centroid_query(&self, entry: &NeighbourhoodEntry) -> String {
        let suburb = entry.suburbs.first().unwrap_or(&entry.name);
        format!("{}, {}, {}", suburb, entry.region, self.settings.country)
    }

    /// Representative point of a neighbourhood, cache first
    pub async fn centroid(&self, entry: &NeighbourhoodEntry) -> std::result::Result<Coordinate, GeoError> {
        let query = self.centroid_query(entry);
        let key = CacheKey::point(&query);
        if let Some(point) = self.cache.get(&key).and_then(CacheValue::into_coordinate) {
            return Ok(point);
        }

        let response =
            geocode_within(self.settings.timeout, self.provider.forward_geocode(&query)).await?;
        self.cache
            .insert(key, CacheValue::Coordinate(response.location));
        Ok(response.location)
    }

    async fn measure(
        &self,
        origin: &Origin,
        entry: &NeighbourhoodEntry,
        radius: Option<f64>,
    ) -> ResolvedNeighbourhood {
        match self.centroid(entry).await {
            Ok(point) => ResolvedNeighbourhood::exact(entry.clone(), haversine_km(origin.point, point)),
            Err(e) => {
                let distance = self.estimate(origin, entry, radius);
                warn!(
                    neighbourhood = %entry.id,
                    kind = e.kind(),
                    distance_km = distance,
                    "centroid unresolved, using estimate"
                );
                ResolvedNeighbourhood::estimated(entry.clone(), distance)
            }
        }
    }

    /// Heuristic distance for a candidate without a centroid
    ///
    /// Outside the origin's region the estimate sits just past the radius so
    /// the filter drops it.
    fn estimate(&self, origin: &Origin, entry: &NeighbourhoodEntry, radius: Option<f64>) -> f64 {
        let same_region = origin
            .region
            .as_deref()
            .is_some_and(|region| entry.in_region(region));

        match (same_region, radius) {
            (true, _) => self.settings.estimated_same_region_km,
            (false, Some(radius)) => radius + OUT_OF_RADIUS_MARGIN_KM,
            (false, None) => self.settings.estimated_other_region_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, NoCache};
    use crate::geo::memory::MemoryGeocoder;
    use crate::geo::ProviderResponse;
    use crate::taxonomy::Taxonomy;
    use approx::assert_relative_eq;

    const PONSONBY: Coordinate = Coordinate {
        lat: -36.856,
        lng: 174.7445,
    };

    /// Ten Auckland neighbourhoods "n0".."n9" with one suburb each
    fn taxonomy() -> Taxonomy {
        let mut doc = String::from(
            "[[regions]]\nkey = \"auckland\"\nname = \"Auckland\"\nlocal_name = \"Tāmaki Makaurau\"\n",
        );
        for i in 0..10 {
            doc.push_str(&format!(
                "[[regions.neighbourhoods]]\nkey = \"n{i}\"\nname = \"N{i}\"\nkind = \"suburban\"\nsuburbs = [\"Suburb {i}\"]\n"
            ));
        }
        Taxonomy::from_toml_str(&doc).unwrap()
    }

    /// Latitude offsets (degrees south of Ponsonby) for n0..n9; n3 and n7 are close
    const OFFSETS: [f64; 10] = [0.30, 0.12, 0.50, 0.02, 0.20, 0.09, 0.70, 0.04, 0.15, 0.40];

    fn geocoder() -> MemoryGeocoder {
        OFFSETS
            .iter()
            .enumerate()
            .fold(MemoryGeocoder::new(), |g, (i, offset)| {
                let query = format!("Suburb {}, Auckland, New Zealand", i);
                let point = Coordinate::new(PONSONBY.lat - offset, PONSONBY.lng);
                g.with_forward(&query, ProviderResponse::new(point, query.clone()))
            })
    }

    fn engine(
        geocoder: Arc<MemoryGeocoder>,
        cache: Arc<dyn ResolutionCache>,
    ) -> ProximityEngine<MemoryGeocoder> {
        ProximityEngine::new(geocoder, cache, ProximitySettings::default())
    }

    fn ids(ranked: &[ResolvedNeighbourhood]) -> Vec<&str> {
        ranked.iter().map(|n| n.entry.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_radius_keeps_only_near_entries() {
        let taxonomy = taxonomy();
        let engine = engine(Arc::new(geocoder()), Arc::new(NoCache));

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), Some(5.0))
            .await;

        assert_eq!(ids(&ranked), ["auckland/n3", "auckland/n7"]);
        assert!(ranked.iter().all(|n| n.confidence == Confidence::Exact));
        assert_relative_eq!(ranked[0].distance_km.unwrap(), 2.224, epsilon = 0.01);
        assert!(ranked.iter().all(|n| n.distance_km.unwrap() <= 5.0));
    }

    #[tokio::test]
    async fn test_results_sorted_ascending() {
        let taxonomy = taxonomy();
        let engine = engine(Arc::new(geocoder()), Arc::new(NoCache));

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;

        assert_eq!(ranked.len(), 10);
        let distances: Vec<f64> = ranked.iter().map(|n| n.distance_km.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ranked[0].entry.id, "auckland/n3");
        assert_eq!(ranked[9].entry.id, "auckland/n6");
    }

    #[tokio::test]
    async fn test_zero_radius_means_no_filter() {
        let taxonomy = taxonomy();
        let engine = engine(Arc::new(geocoder()), Arc::new(NoCache));

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), Some(0.0))
            .await;
        assert_eq!(ranked.len(), 10);
    }

    #[tokio::test]
    async fn test_equal_distances_keep_declaration_order() {
        let taxonomy = taxonomy();
        let same = Coordinate::new(-36.9, 174.7445);
        let geocoder = (0..10).fold(MemoryGeocoder::new(), |g, i| {
            let query = format!("Suburb {}, Auckland, New Zealand", i);
            g.with_forward(&query, ProviderResponse::new(same, query.clone()))
        });
        let engine = engine(Arc::new(geocoder), Arc::new(NoCache));

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;
        let expected: Vec<String> = (0..10).map(|i| format!("auckland/n{}", i)).collect();
        assert_eq!(ids(&ranked), expected);
    }

    #[tokio::test]
    async fn test_unresolved_centroid_is_estimated_not_dropped() {
        let taxonomy = taxonomy();
        let geocoder = geocoder()
            .with_forward_error("Suburb 0, Auckland, New Zealand", GeoError::RateLimited)
            .with_forward_error(
                "Suburb 6, Auckland, New Zealand",
                GeoError::ProviderUnavailable("down".to_string()),
            );
        let engine = engine(Arc::new(geocoder), Arc::new(NoCache));

        // Same region: near estimate
        let origin = Origin::new(PONSONBY).with_region("Tāmaki Makaurau");
        let ranked = engine.rank(&origin, taxonomy.all_entries(), None).await;
        assert_eq!(ranked.len(), 10);
        let estimated: Vec<&ResolvedNeighbourhood> =
            ranked.iter().filter(|n| n.is_estimated()).collect();
        assert_eq!(estimated.len(), 2);
        assert!(estimated.iter().all(|n| n.distance_km == Some(5.0)));

        // Unknown region, no radius: far estimate
        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;
        let last = &ranked[ranked.len() - 2..];
        assert!(last.iter().all(|n| n.distance_km == Some(100.0) && n.is_estimated()));

        // Unknown region with a radius: pushed just outside and filtered
        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), Some(30.0))
            .await;
        assert!(ranked.iter().all(|n| !n.is_estimated()));
    }

    #[tokio::test]
    async fn test_same_region_estimate_survives_radius() {
        let taxonomy = taxonomy();
        let geocoder =
            geocoder().with_forward_error("Suburb 6, Auckland, New Zealand", GeoError::RateLimited);
        let engine = engine(Arc::new(geocoder), Arc::new(NoCache));

        let origin = Origin::new(PONSONBY).with_region("auckland");
        let ranked = engine.rank(&origin, taxonomy.all_entries(), Some(6.0)).await;

        assert_eq!(ids(&ranked), ["auckland/n3", "auckland/n7", "auckland/n6"]);
        assert_eq!(ranked[2].confidence, Confidence::Estimated);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let taxonomy = taxonomy();
        let geocoder = Arc::new(geocoder().with_latency(Duration::from_millis(20)));
        let settings = ProximitySettings {
            concurrency: 3,
            ..ProximitySettings::default()
        };
        let engine = ProximityEngine::new(geocoder.clone(), Arc::new(NoCache), settings);

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;

        assert_eq!(ranked.len(), 10);
        assert_eq!(geocoder.call_count(), 10);
        assert!(geocoder.peak_in_flight() <= 3);
        assert!(geocoder.peak_in_flight() >= 2);
    }

    #[tokio::test]
    async fn test_paced_provider_is_not_overrun() {
        use crate::geo::pacing::RequestPacer;
        use std::time::Instant;

        let taxonomy = taxonomy();
        let geocoder = Arc::new(geocoder().with_pacer(RequestPacer::from_millis(30)));
        let settings = ProximitySettings {
            concurrency: 4,
            ..ProximitySettings::default()
        };
        let engine = ProximityEngine::new(geocoder.clone(), Arc::new(NoCache), settings);

        let start = Instant::now();
        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;

        // Ten lookups one interval apart, none degraded by the wait
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(geocoder.call_count(), 10);
        assert!(ranked.iter().all(|n| n.confidence == Confidence::Exact));
    }

    #[tokio::test]
    async fn test_zero_concurrency_runs_serially() {
        let taxonomy = taxonomy();
        let geocoder = Arc::new(geocoder().with_latency(Duration::from_millis(2)));
        let settings = ProximitySettings {
            concurrency: 0,
            ..ProximitySettings::default()
        };
        let engine = ProximityEngine::new(geocoder.clone(), Arc::new(NoCache), settings);

        let ranked = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None)
            .await;
        assert_eq!(ranked.len(), 10);
        assert_eq!(geocoder.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_centroids_are_cached() {
        let taxonomy = taxonomy();
        let geocoder = Arc::new(geocoder());
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(60)));
        let engine = engine(geocoder.clone(), cache.clone());

        let first = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), Some(5.0))
            .await;
        assert_eq!(geocoder.call_count(), 10);

        let second = engine
            .rank(&Origin::new(PONSONBY), taxonomy.all_entries(), Some(5.0))
            .await;
        assert_eq!(geocoder.call_count(), 10);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 10);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let taxonomy = taxonomy();
        let geocoder = Arc::new(
            geocoder().with_forward_error("Suburb 0, Auckland, New Zealand", GeoError::RateLimited),
        );
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(60)));
        let engine = engine(geocoder.clone(), cache);

        engine.rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None).await;
        engine.rank(&Origin::new(PONSONBY), taxonomy.all_entries(), None).await;
        // The failing candidate is retried, the rest come from the cache
        assert_eq!(geocoder.call_count(), 11);
    }

    #[test]
    fn test_centroid_query() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let engine = engine(Arc::new(MemoryGeocoder::new()), Arc::new(NoCache));
        let central = taxonomy.get("auckland/central").unwrap();
        assert_eq!(
            engine.centroid_query(central),
            "Auckland CBD, Auckland, New Zealand"
        );
    }

    #[test]
    fn test_validate_radius() {
        assert_eq!(validate_radius(None).unwrap(), None);
        assert_eq!(validate_radius(Some(0.0)).unwrap(), Some(0.0));
        assert_eq!(validate_radius(Some(2.5)).unwrap(), Some(2.5));
        assert!(validate_radius(Some(-1.0)).is_err());
        assert!(validate_radius(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_origin_with_blank_region() {
        assert_eq!(Origin::new(PONSONBY).with_region("  ").region, None);
    }

    #[test]
    fn test_resolved_serialization_is_flat() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let entry = taxonomy.get("auckland/central").unwrap().clone();
        let json = serde_json::to_value(ResolvedNeighbourhood::estimated(entry, 5.0)).unwrap();
        assert_eq!(json["id"], "auckland/central");
        assert_eq!(json["distance_km"], 5.0);
        assert_eq!(json["confidence"], "estimated");
    }
}
