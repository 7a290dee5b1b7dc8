//! In-process geocoder and locator
//!
//! Answers from a fixed table instead of the network. Tracks call counts and
//! concurrency so callers can observe how the engine uses a provider.

use crate::address::normalize;
use crate::coord::Coordinate;
use crate::error::GeoError;
use crate::geo::pacing::RequestPacer;
use crate::geo::{DeviceLocator, GeoProvider, ProviderResponse};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Table-driven geocoder
#[derive(Debug, Default)]
pub struct MemoryGeocoder {
    forward: HashMap<String, std::result::Result<ProviderResponse, GeoError>>,
    reverse: HashMap<String, std::result::Result<ProviderResponse, GeoError>>,
    latency: Option<Duration>,
    pacer: RequestPacer,
    calls: AtomicUsize,
    completed: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight gauge even when the call is dropped mid-way
struct InFlight<'a> {
    geocoder: &'a MemoryGeocoder,
}

impl<'a> InFlight<'a> {
    fn enter(geocoder: &'a MemoryGeocoder) -> Self {
        geocoder.calls.fetch_add(1, Ordering::SeqCst);
        let now = geocoder.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        geocoder.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { geocoder }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.geocoder.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryGeocoder {
    /// Create an empty geocoder (every lookup is NotFound)
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `response`
    pub fn with_forward(mut self, query: &str, response: ProviderResponse) -> Self {
        self.forward.insert(normalize(query), Ok(response));
        self
    }

    /// Fail `query` with `error`
    pub fn with_forward_error(mut self, query: &str, error: GeoError) -> Self {
        self.forward.insert(normalize(query), Err(error));
        self
    }

    /// Answer reverse lookups at `coord` with `response`
    pub fn with_reverse(mut self, coord: Coordinate, response: ProviderResponse) -> Self {
        self.reverse.insert(coord.key(), Ok(response));
        self
    }

    /// Fail reverse lookups at `coord` with `error`
    pub fn with_reverse_error(mut self, coord: Coordinate, error: GeoError) -> Self {
        self.reverse.insert(coord.key(), Err(error));
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Space lookups like a rate-limited remote provider
    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Number of lookups started
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of lookups that ran to completion
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous lookups observed
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(
        &self,
        table: &HashMap<String, std::result::Result<ProviderResponse, GeoError>>,
        key: String,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        self.pacer.ready().await;
        let _guard = InFlight::enter(self);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        table
            .get(&key)
            .cloned()
            .unwrap_or(Err(GeoError::NotFound(key)))
    }
}

impl GeoProvider for MemoryGeocoder {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn forward_geocode(
        &self,
        query: &str,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        self.answer(&self.forward, normalize(query)).await
    }

    async fn reverse_geocode(
        &self,
        coord: Coordinate,
    ) -> std::result::Result<ProviderResponse, GeoError> {
        self.answer(&self.reverse, coord.key()).await
    }
}

/// Locator that always reports the same outcome
#[derive(Debug, Clone)]
pub struct FixedLocator {
    outcome: std::result::Result<Coordinate, GeoError>,
}

impl FixedLocator {
    /// Locator that reports `coord`
    pub fn at(coord: Coordinate) -> Self {
        Self { outcome: Ok(coord) }
    }

    /// Locator that fails with `error`
    pub fn failing(error: GeoError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl DeviceLocator for FixedLocator {
    async fn current_location(&self) -> std::result::Result<Coordinate, GeoError> {
        self.outcome.clone()
    }
}
