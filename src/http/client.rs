//! HTTP transport and request executor
//!
//! [`HttpClient`] owns the connection pool, base URL and per-attempt timeout.
//! It is cheap to clone and is shared by every page task of a fetch.
//!
//! [`RequestExecutor`] pairs a client with its own [`Backoff`] and retries a
//! request for as long as the server answers with its rate-limit signal.
//! Any other response, success or not, is handed back untouched.

use super::backoff::Backoff;
use super::rate_limit::{is_rate_limited, QuotaHeaders, RateLimiter};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{FetchRequest, Query, APP_ID_PARAM};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Marker appended to every request path to select the JSON representation
pub const JSON_SUFFIX: &str = ".json";

/// Longest body excerpt carried by an `HttpStatus` error
const ERROR_BODY_LIMIT: usize = 512;

// ============================================================================
// Response
// ============================================================================

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub quota: QuotaHeaders,
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether this response carries the server's rate-limit signal
    pub fn is_rate_limited(&self) -> bool {
        is_rate_limited(self.status, &self.quota, &self.body)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turn a non-success status into an `HttpStatus` error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let mut body = self.text();
        if body.len() > ERROR_BODY_LIMIT {
            let mut cut = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(Error::http_status(self.status.as_u16(), body))
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::decode(format!("{} from {}", e, self.url)))
    }
}

// ============================================================================
// Client
// ============================================================================

struct Shared {
    config: ClientConfig,
    base_url: Url,
    rate_limiter: Option<RateLimiter>,
}

/// HTTP transport shared by all executors of one API client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    shared: Arc<Shared>,
}

impl HttpClient {
    /// Create a client from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            shared: Arc::new(Shared {
                config,
                base_url,
                rate_limiter,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    /// Check if client-side pacing is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.shared.rate_limiter.is_some()
    }

    /// A fresh executor with its own backoff state
    pub fn executor(&self) -> RequestExecutor {
        RequestExecutor::new(self.clone())
    }

    /// Build the request URL: base path, request path, JSON suffix, then the
    /// query (plus `app_id` when configured).
    pub fn build_url(&self, path: &str, query: &Query) -> Url {
        let mut url = self.shared.base_url.clone();
        let joined = format!(
            "{}/{}{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/'),
            JSON_SUFFIX
        );
        url.set_path(&joined);
        url.set_query(None);

        let mut query = query.clone();
        let app_id = &self.shared.config.app_id;
        if !app_id.is_empty() {
            query.insert(APP_ID_PARAM.to_string(), app_id.clone());
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Send one attempt and read the whole body. No retries.
    pub async fn send(&self, request: &FetchRequest) -> Result<HttpResponse> {
        if let Some(ref limiter) = self.shared.rate_limiter {
            limiter.wait().await;
        }

        let url = self.build_url(&request.path, &request.query);
        debug!("{} {}", request.method, url);

        let mut req = self.client.request(request.method.clone(), url.clone());
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        let quota = QuotaHeaders::from_headers(&headers);
        if !quota.is_empty() {
            debug!(
                overall_remaining = ?quota.overall_remaining,
                specific_remaining = ?quota.specific_remaining,
                "Quota for {}",
                url.path()
            );
        }

        Ok(HttpResponse {
            url,
            status,
            headers,
            quota,
            body,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.shared.config.timeout.as_millis() as u64,
            }
        } else {
            Error::Transport(err)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.shared.base_url.as_str())
            .field("config", &self.shared.config)
            .field("has_rate_limiter", &self.has_rate_limiter())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Issues requests and absorbs rate limiting.
///
/// The retry loop has no attempt limit. A single attempt is bounded by the
/// client timeout; callers that need an overall deadline wrap the call in
/// `tokio::time::timeout`.
#[derive(Debug)]
pub struct RequestExecutor {
    client: HttpClient,
    backoff: Backoff,
    retries: u64,
}

impl RequestExecutor {
    pub fn new(client: HttpClient) -> Self {
        let backoff = Backoff::new(&client.config().backoff);
        Self {
            client,
            backoff,
            retries: 0,
        }
    }

    /// Execute a request, retrying while the server reports rate limiting.
    ///
    /// Transport failures return immediately. Every other response is
    /// returned as-is with the backoff reset.
    pub async fn execute(&mut self, request: &FetchRequest) -> Result<HttpResponse> {
        let mut attempt: u32 = 1;
        loop {
            let response = self.client.send(request).await?;

            if !response.is_rate_limited() {
                self.backoff.reset();
                return Ok(response);
            }

            let delay = self.backoff.next();
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Rate limited ({}) on {}, retrying in {:?}",
                response.status.as_u16(),
                response.url.path(),
                delay
            );
            self.retries += 1;
            attempt = attempt.saturating_add(1);
            tokio::time::sleep(delay).await;
        }
    }

    /// Total rate-limited attempts this executor has retried
    pub fn retries(&self) -> u64 {
        self.retries
    }

    /// Base delay the next rate-limited retry would start from
    pub fn next_delay(&self) -> Duration {
        self.backoff.current()
    }
}
