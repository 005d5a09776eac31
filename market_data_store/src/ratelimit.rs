//! Client-side API rate limiting.
//!
//! Upstox enforces a per-minute request quota; exceeding it returns HTTP
//! 429 and can temporarily block the token. Ingest pipelines acquire a
//! permit from [`ApiRateLimiter`] before every provider call.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub struct ApiRateLimiter {
    limiter: DirectLimiter,
}

impl ApiRateLimiter {
    /// Limiter allowing `requests_per_minute` calls per rolling minute.
    ///
    /// A zero argument falls back to a single request per minute rather
    /// than panicking.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let quota = NonZeroU32::new(requests_per_minute).unwrap_or(nonzero!(1u32));
        Self {
            limiter: RateLimiter::direct(Quota::per_minute(quota)),
        }
    }

    /// Wait until a request permit is available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Non-blocking permit check. Returns `false` when the quota is
    /// currently exhausted.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
