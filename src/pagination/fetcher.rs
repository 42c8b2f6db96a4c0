//! Concurrent page fetcher
//!
//! Fans page requests out onto the tokio runtime and fans the results back
//! in. Each task gets its own copy of the request (with its page number
//! already set) and its own executor, so no mutable state is shared between
//! tasks. A semaphore caps how many requests are in flight.
//!
//! The first failed page fails the whole fetch. Tasks still running at that
//! point are detached: they finish on their own and their results are
//! dropped.

use super::types::{IndexedPage, PageEnvelope, PageSlot};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{FetchRequest, Resource};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Fetch pages `first_page..=last_page` of `base` concurrently.
///
/// The returned pages are in ascending page order regardless of the order
/// in which they completed. An empty range yields an empty vector.
pub async fn fetch_pages<T: Resource>(
    client: &HttpClient,
    base: &FetchRequest,
    first_page: u32,
    last_page: u32,
) -> Result<Vec<IndexedPage<T>>> {
    if first_page > last_page {
        return Ok(Vec::new());
    }

    let semaphore = Arc::new(Semaphore::new(client.config().max_concurrency));
    let mut tasks = FuturesUnordered::new();

    for page in first_page..=last_page {
        let request = base.for_page(page);
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);

        let handle = tokio::spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => fetch_one::<T>(&client, &request).await,
                Err(e) => Err(Error::Other(format!("page semaphore closed: {e}"))),
            };
            PageSlot { page, result }
        });

        tasks.push(async move {
            handle.await.unwrap_or_else(|e| PageSlot {
                page,
                result: Err(Error::Other(format!("page task failed: {e}"))),
            })
        });
    }

    debug!(
        first_page,
        last_page,
        path = %base.path,
        "Dispatched page requests"
    );

    let mut pages = Vec::with_capacity(tasks.len());
    while let Some(slot) = tasks.next().await {
        match slot.result {
            Ok(envelope) => pages.push(IndexedPage {
                page: slot.page,
                envelope,
            }),
            Err(e) => {
                warn!(page = slot.page, "Page fetch failed, abandoning {}: {}", base.path, e);
                return Err(Error::partial_fetch(slot.page, e));
            }
        }
    }

    sort_pages(&mut pages);
    Ok(pages)
}

/// Put pages into ascending page order
pub fn sort_pages<T>(pages: &mut [IndexedPage<T>]) {
    pages.sort_by_key(|p| p.page);
}

async fn fetch_one<T: Resource>(
    client: &HttpClient,
    request: &FetchRequest,
) -> Result<PageEnvelope<T>> {
    let mut executor = client.executor();
    let response = executor.execute(request).await?.error_for_status()?;
    PageEnvelope::from_json(&response.body)
}
