//! Rate limiting support
//!
//! Two halves: an optional client-side token bucket (governor) that paces
//! outgoing requests, and detection of the server's own rate-limit signal.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::num::NonZeroU32;
use std::sync::Arc;

pub const OVERALL_LIMIT_HEADER: &str = "x-ratelimit-overall-limit";
pub const OVERALL_REMAINING_HEADER: &str = "x-ratelimit-overall-remaining";
pub const SPECIFIC_LIMIT_HEADER: &str = "x-ratelimit-specific-limit";
pub const SPECIFIC_REMAINING_HEADER: &str = "x-ratelimit-specific-remaining";

// ============================================================================
// Client-side pacing
// ============================================================================

/// Configuration for client-side pacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket shared by every request of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

// ============================================================================
// Server signal
// ============================================================================

/// Quota counters the server reports on each response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaHeaders {
    pub overall_limit: Option<u64>,
    pub overall_remaining: Option<u64>,
    pub specific_limit: Option<u64>,
    pub specific_remaining: Option<u64>,
}

impl QuotaHeaders {
    /// Read quota counters from response headers. Missing or malformed
    /// headers are left as `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
        };

        Self {
            overall_limit: read(OVERALL_LIMIT_HEADER),
            overall_remaining: read(OVERALL_REMAINING_HEADER),
            specific_limit: read(SPECIFIC_LIMIT_HEADER),
            specific_remaining: read(SPECIFIC_REMAINING_HEADER),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when either counter reports no requests left
    pub fn exhausted(&self) -> bool {
        self.overall_remaining == Some(0) || self.specific_remaining == Some(0)
    }
}

/// Whether a response is the server's "403 Forbidden (Rate Limit Exceeded)"
/// signal. 429 is accepted as well.
pub fn is_rate_limited(status: StatusCode, quota: &QuotaHeaders, body: &[u8]) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    if status != StatusCode::FORBIDDEN {
        return false;
    }
    quota.exhausted()
        || String::from_utf8_lossy(body)
            .to_ascii_lowercase()
            .contains("rate limit")
}
