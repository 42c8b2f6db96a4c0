//! Page discovery
//!
//! Fetches page 1 of a collection and works out how many pages the caller
//! still needs. The page target is fixed here and never re-read from later
//! pages.

use super::types::{Discovery, PageEnvelope, PagingMetadata};
use crate::error::{Error, Result};
use crate::http::RequestExecutor;
use crate::types::{FetchRequest, Resource, PAGE_PARAM};
use tracing::debug;

/// Last page number to fetch given the first page's counters.
///
/// `requested_pages` of `0` means every page, `1` means only the first.
/// Returns `0` when nothing beyond page 1 is needed.
pub fn pages_to_fetch(paging: &PagingMetadata, requested_pages: i64) -> Result<u32> {
    if requested_pages < 0 {
        return Err(Error::invalid_argument(format!(
            "page count must not be negative, got {requested_pages}"
        )));
    }
    if paging.is_single_page() {
        return Ok(0);
    }
    Ok(match requested_pages {
        0 => paging.pages,
        1 => 0,
        n => n.min(i64::from(paging.pages)) as u32,
    })
}

/// Fetch the first page of `request` and plan the rest.
///
/// Any `page` parameter on the request is dropped so the server returns its
/// first page.
pub async fn discover<T: Resource>(
    executor: &mut RequestExecutor,
    request: &FetchRequest,
    requested_pages: i64,
) -> Result<Discovery<T>> {
    if requested_pages < 0 {
        return Err(Error::invalid_argument(format!(
            "page count must not be negative, got {requested_pages}"
        )));
    }

    let mut first_request = request.clone();
    first_request.query.remove(PAGE_PARAM);

    let response = executor.execute(&first_request).await?.error_for_status()?;
    let first = PageEnvelope::<T>::from_json(&response.body)?;
    let pages_to_fetch = pages_to_fetch(&first.paging, requested_pages)?;

    debug!(
        total = first.paging.total,
        pages = first.paging.pages,
        pages_to_fetch,
        "Discovered {}",
        request.path
    );

    Ok(Discovery {
        first,
        pages_to_fetch,
    })
}
