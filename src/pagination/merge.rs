//! Result merging

use super::fetcher::sort_pages;
use super::types::{IndexedPage, PageEnvelope};
use tracing::debug;

/// Flatten page 1 and the remaining pages into one item list.
///
/// Pages are ordered by page number, never by arrival. Items keep their
/// order within a page. Nothing is deduplicated or trimmed to
/// `paging.total`: if the collection changed between page requests, the
/// result reflects whatever the pages held.
pub fn merge<T>(first: PageEnvelope<T>, mut rest: Vec<IndexedPage<T>>) -> Vec<T> {
    sort_pages(&mut rest);

    let declared_total = first.paging.total;
    let count = first.items.len() + rest.iter().map(|p| p.envelope.items.len()).sum::<usize>();

    let mut items = Vec::with_capacity(count);
    items.extend(first.items);
    for page in rest {
        items.extend(page.envelope.items);
    }

    if items.len() as u64 != declared_total {
        debug!(
            merged = items.len(),
            declared_total, "Merged item count differs from declared total"
        );
    }
    items
}
