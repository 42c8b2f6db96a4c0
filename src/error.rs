//! Error types for microlend
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Rate limiting never shows up here: the request executor absorbs it.

use thiserror::Error;

/// The main error type for microlend
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller / Configuration Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Fetching page {page} failed: {source}")]
    PartialFetch {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap the error of a failed page task
    pub fn partial_fetch(page: u32, source: Error) -> Self {
        Self::PartialFetch {
            page,
            source: Box::new(source),
        }
    }

    /// True for failures at the network layer (connect, timeout, broken body)
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout { .. } => true,
            Error::PartialFetch { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// The innermost error, looking through `PartialFetch` wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::PartialFetch { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

/// Result type alias for microlend
pub type Result<T> = std::result::Result<T, Error>;
