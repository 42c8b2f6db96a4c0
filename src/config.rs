//! Client configuration
//!
//! Every [`Client`](crate::Client) is built from an explicit [`ClientConfig`].
//! Configs can be assembled with the builder or loaded from YAML:
//!
//! ```yaml
//! base_url: https://api.example.org
//! app_id: org.example.demo
//! timeout_ms: 10000
//! max_concurrency: 4
//! backoff:
//!   min_ms: 500
//!   max_ms: 30000
//!   jitter: true
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://api.example.org";

/// Per-attempt request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of page requests in flight per paged fetch
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// ============================================================================
// Backoff Config
// ============================================================================

/// Settings for the rate-limit backoff policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// First delay after a rate-limited response
    pub min: Duration,
    /// Upper bound for any delay
    pub max: Duration,
    /// Randomize each delay by up to ±25%
    pub jitter: bool,
    /// Fixed jitter seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_secs(30),
            jitter: true,
            seed: None,
        }
    }
}

impl BackoffConfig {
    /// Create a backoff config without jitter
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            jitter: false,
            seed: None,
        }
    }

    /// Enable jitter with a fixed seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.jitter = true;
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min.is_zero() {
            return Err(Error::config("backoff min must be greater than zero"));
        }
        if self.min > self.max {
            return Err(Error::config(format!(
                "backoff min ({:?}) exceeds max ({:?})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all request paths are joined onto
    pub base_url: String,
    /// Application id sent as `app_id` on every request when non-empty
    pub app_id: String,
    /// Timeout for a single HTTP attempt
    pub timeout: Duration,
    /// Rate-limit backoff policy settings
    pub backoff: BackoffConfig,
    /// Cap on concurrently dispatched page requests
    pub max_concurrency: usize,
    /// Optional client-side request pacing
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: String::new(),
            timeout: DEFAULT_TIMEOUT,
            backoff: BackoffConfig::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            rate_limit: None,
            user_agent: format!("microlend/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse the base URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Check the config for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        let url = self.parsed_base_url()?;
        if url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }
        if self.max_concurrency == 0 {
            return Err(Error::config("max_concurrency must be at least 1"));
        }
        self.backoff.validate()
    }

    /// Load a config from a YAML string. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        let config = Self::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL. An empty string keeps the default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.config.base_url = url;
        }
        self
    }

    /// Set the application id
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.config.app_id = app_id.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the backoff policy
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set the page request concurrency cap
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.config.max_concurrency = max;
        self
    }

    /// Enable client-side pacing
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// File Format
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    app_id: Option<String>,
    timeout_ms: Option<u64>,
    max_concurrency: Option<usize>,
    user_agent: Option<String>,
    backoff: Option<BackoffFile>,
    rate_limit: Option<RateLimitFile>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BackoffFile {
    min_ms: Option<u64>,
    max_ms: Option<u64>,
    jitter: Option<bool>,
    seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RateLimitFile {
    requests_per_second: u32,
    #[serde(default)]
    burst_size: Option<u32>,
}

impl From<ConfigFile> for ClientConfig {
    fn from(file: ConfigFile) -> Self {
        let mut config = ClientConfig::builder()
            .base_url(file.base_url.unwrap_or_default())
            .app_id(file.app_id.unwrap_or_default())
            .build();

        if let Some(ms) = file.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(max) = file.max_concurrency {
            config.max_concurrency = max;
        }
        if let Some(agent) = file.user_agent {
            config.user_agent = agent;
        }
        if let Some(backoff) = file.backoff {
            let defaults = BackoffConfig::default();
            config.backoff = BackoffConfig {
                min: backoff.min_ms.map_or(defaults.min, Duration::from_millis),
                max: backoff.max_ms.map_or(defaults.max, Duration::from_millis),
                jitter: backoff.jitter.unwrap_or(defaults.jitter),
                seed: backoff.seed,
            };
        }
        if let Some(limit) = file.rate_limit {
            config.rate_limit = Some(RateLimiterConfig::new(
                limit.requests_per_second,
                limit.burst_size.unwrap_or(limit.requests_per_second),
            ));
        }
        config
    }
}
