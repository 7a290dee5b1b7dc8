//! Request pacing for rate-limited providers
//!
//! Public geocoders cap the request rate per client (Nominatim: one per
//! second). A `RequestPacer` spaces calls at least `min_interval` apart,
//! independently of how many lookups are in flight.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Shared minimum-interval limiter; clones pace against the same budget
#[derive(Clone, Default)]
pub struct RequestPacer {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    min_interval: Duration,
}

impl RequestPacer {
    /// Allow one request per `min_interval`; a zero interval never waits
    pub fn new(min_interval: Duration) -> Self {
        Self {
            limiter: Quota::with_period(min_interval).map(|quota| Arc::new(RateLimiter::direct(quota))),
            min_interval,
        }
    }

    /// Pacer that never waits
    pub fn unpaced() -> Self {
        Self::default()
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn is_paced(&self) -> bool {
        self.limiter.is_some()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request may be sent
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPacer")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}
