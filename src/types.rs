//! Common types used throughout microlend
//!
//! Request shapes and the decode-target capability shared by the HTTP and
//! pagination layers.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters. Keys are unique and encode in a stable order.
pub type Query = BTreeMap<String, String>;

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the application id
pub const APP_ID_PARAM: &str = "app_id";

// ============================================================================
// Decode Target
// ============================================================================

/// An item type the API returns inside a named collection.
///
/// The collection name is the key holding the item array in a response
/// envelope, e.g. `{"paging": {...}, "loans": [...]}`.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Envelope key holding the items
    const COLLECTION: &'static str;
}

// ============================================================================
// Fetch Request
// ============================================================================

/// A single request against the API.
///
/// Each request owns its query map. Page tasks clone the base request and
/// set their page number on the clone before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub method: reqwest::Method,
    /// Path relative to the base URL, without the `.json` suffix
    pub path: String,
    pub query: Query,
    pub body: Option<JsonValue>,
}

impl FetchRequest {
    /// Create a GET request for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: reqwest::Method::GET,
            path: path.into(),
            query: Query::new(),
            body: None,
        }
    }

    /// Replace the query map
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Copy of this request targeting a specific page
    #[must_use]
    pub fn for_page(&self, page: u32) -> Self {
        let mut request = self.clone();
        request.query.insert(PAGE_PARAM.to_string(), page.to_string());
        request
    }
}
