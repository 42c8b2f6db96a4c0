//! HTTP layer
//!
//! Provides the request executor and the pieces it is built from.
//!
//! # Features
//!
//! - **Rate-limit absorption**: the server's rate-limit signal is retried
//!   with exponential backoff until a normal response arrives
//! - **Backoff**: exponential with optional seeded jitter
//! - **Client-side pacing**: optional token bucket using governor
//! - **Quota visibility**: rate-limit quota headers parsed and logged

mod backoff;
mod client;
mod rate_limit;

pub use backoff::Backoff;
pub use client::{HttpClient, HttpResponse, RequestExecutor, JSON_SUFFIX};
pub use rate_limit::{is_rate_limited, QuotaHeaders, RateLimiter, RateLimiterConfig};
