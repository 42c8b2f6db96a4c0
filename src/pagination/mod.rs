//! Pagination module
//!
//! Discover, fan out, merge.
//!
//! # Overview
//!
//! A paged fetch runs in three steps:
//! 1. [`discover`] fetches page 1 and fixes the last page to fetch
//! 2. [`fetch_pages`] requests the remaining pages concurrently
//! 3. [`merge`] concatenates all items in page order

mod discover;
mod fetcher;
mod merge;
mod types;

pub use discover::{discover, pages_to_fetch};
pub use fetcher::{fetch_pages, sort_pages};
pub use merge::merge;
pub use types::{decode_unpaged, Discovery, IndexedPage, PageEnvelope, PageSlot, PagingMetadata};

#[cfg(test)]
mod tests;
