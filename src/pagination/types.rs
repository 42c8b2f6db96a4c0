//! Pagination types
//!
//! Envelope shapes and decoding. A paged response looks like
//! `{"paging": {...}, "<collection>": [...]}`; an unpaged one carries only the
//! collection key.

use crate::error::{Error, Result};
use crate::types::{JsonObject, Resource};
use serde::{Deserialize, Serialize};

/// Pagination counters reported by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingMetadata {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
}

impl PagingMetadata {
    /// True when no page beyond the first exists
    pub fn is_single_page(&self) -> bool {
        self.pages <= 1
    }

    /// `ceil(total / page_size)`, or `None` when the page size is zero
    pub fn expected_pages(&self) -> Option<u64> {
        if self.page_size == 0 {
            return None;
        }
        Some(self.total.div_ceil(u64::from(self.page_size)))
    }
}

/// One page worth of items plus its paging counters
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope<T> {
    pub paging: PagingMetadata,
    pub items: Vec<T>,
}

impl<T: Resource> PageEnvelope<T> {
    /// Decode a paged response body. Both `paging` and the collection key
    /// must be present.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let mut object = parse_object(body)?;

        let paging = object
            .remove("paging")
            .ok_or_else(|| Error::decode("response has no 'paging' object"))?;
        let paging: PagingMetadata = serde_json::from_value(paging)
            .map_err(|e| Error::decode(format!("invalid 'paging' object: {e}")))?;

        let items = take_items(&mut object)?;
        Ok(Self { paging, items })
    }
}

/// Decode an unpaged response body into its items
pub fn decode_unpaged<T: Resource>(body: &[u8]) -> Result<Vec<T>> {
    let mut object = parse_object(body)?;
    take_items(&mut object)
}

fn parse_object(body: &[u8]) -> Result<JsonObject> {
    serde_json::from_slice(body).map_err(|e| Error::decode(format!("expected a JSON object: {e}")))
}

fn take_items<T: Resource>(object: &mut JsonObject) -> Result<Vec<T>> {
    let items = object.remove(T::COLLECTION).ok_or_else(|| {
        Error::decode(format!("response has no '{}' collection", T::COLLECTION))
    })?;
    serde_json::from_value(items)
        .map_err(|e| Error::decode(format!("invalid '{}' item: {e}", T::COLLECTION)))
}

/// A decoded page tagged with its page number
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPage<T> {
    pub page: u32,
    pub envelope: PageEnvelope<T>,
}

/// Outcome of one dispatched page request. Filled once by its task and
/// consumed once by the fetcher.
#[derive(Debug)]
pub struct PageSlot<T> {
    pub page: u32,
    pub result: Result<PageEnvelope<T>>,
}

/// What the first page tells us about the rest of the fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery<T> {
    pub first: PageEnvelope<T>,
    /// Last page number to fetch; `0` means the first page is enough
    pub pages_to_fetch: u32,
}

impl<T> Discovery<T> {
    /// Page numbers still to fetch concurrently
    pub fn remaining(&self) -> std::ops::RangeInclusive<u32> {
        2..=self.pages_to_fetch
    }
}
