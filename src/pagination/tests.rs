//! Tests for pagination module

use super::*;
use crate::config::{BackoffConfig, ClientConfig};
use crate::error::Error;
use crate::http::HttpClient;
use crate::types::{FetchRequest, Resource};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Widget {
    id: u32,
}

impl Resource for Widget {
    const COLLECTION: &'static str = "widgets";
}

fn paging(total: u64, page: u32, page_size: u32, pages: u32) -> PagingMetadata {
    PagingMetadata {
        total,
        page,
        page_size,
        pages,
    }
}

fn envelope(page: u32, ids: &[u32]) -> PageEnvelope<Widget> {
    PageEnvelope {
        paging: paging(0, page, 20, 0),
        items: ids.iter().map(|&id| Widget { id }).collect(),
    }
}

fn indexed(page: u32, ids: &[u32]) -> IndexedPage<Widget> {
    IndexedPage {
        page,
        envelope: envelope(page, ids),
    }
}

fn page_body(page: u32, pages: u32, total: u64, ids: std::ops::Range<u32>) -> serde_json::Value {
    let widgets: Vec<_> = ids.map(|id| json!({ "id": id })).collect();
    json!({
        "paging": {"total": total, "page": page, "page_size": 20, "pages": pages},
        "widgets": widgets,
    })
}

fn client_for(server: &MockServer, max_concurrency: usize) -> HttpClient {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .max_concurrency(max_concurrency)
        .backoff(BackoffConfig::new(
            Duration::from_millis(1),
            Duration::from_millis(4),
        ))
        .build();
    HttpClient::new(config).unwrap()
}

async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_paging_metadata_deserialize() {
    let meta: PagingMetadata =
        serde_json::from_value(json!({"total": 50, "page": 1, "page_size": 20, "pages": 3}))
            .unwrap();
    pretty_assertions::assert_eq!(meta, paging(50, 1, 20, 3));
    pretty_assertions::assert_eq!(meta.expected_pages(), Some(3));
    assert!(!meta.is_single_page());
}

#[test]
fn test_paging_metadata_zero_page_size() {
    let meta = paging(0, 1, 0, 0);
    pretty_assertions::assert_eq!(meta.expected_pages(), None);
    assert!(meta.is_single_page());
}

#[test]
fn test_page_envelope_from_json() {
    let body = serde_json::to_vec(&page_body(1, 3, 50, 0..20)).unwrap();
    let env = PageEnvelope::<Widget>::from_json(&body).unwrap();

    pretty_assertions::assert_eq!(env.paging, paging(50, 1, 20, 3));
    pretty_assertions::assert_eq!(env.items.len(), 20);
    pretty_assertions::assert_eq!(env.items[19], Widget { id: 19 });
}

#[test]
fn test_page_envelope_missing_paging() {
    let body = br#"{"widgets": [{"id": 1}]}"#;
    let err = PageEnvelope::<Widget>::from_json(body).unwrap_err();
    assert!(matches!(err, Error::Decode { ref message } if message.contains("paging")));
}

#[test]
fn test_page_envelope_missing_collection() {
    let body = br#"{"paging": {"total": 1, "page": 1, "page_size": 20, "pages": 1}, "loans": []}"#;
    let err = PageEnvelope::<Widget>::from_json(body).unwrap_err();
    assert!(matches!(err, Error::Decode { ref message } if message.contains("widgets")));
}

#[test]
fn test_page_envelope_bad_item() {
    let body = br#"{"paging": {"total": 1, "page": 1, "page_size": 20, "pages": 1}, "widgets": [{"id": "x"}]}"#;
    assert!(matches!(
        PageEnvelope::<Widget>::from_json(body),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_page_envelope_not_an_object() {
    assert!(matches!(
        PageEnvelope::<Widget>::from_json(b"[1, 2, 3]"),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_decode_unpaged() {
    let body = br#"{"widgets": [{"id": 7}, {"id": 3}]}"#;
    let items = decode_unpaged::<Widget>(body).unwrap();
    pretty_assertions::assert_eq!(items, vec![Widget { id: 7 }, Widget { id: 3 }]);
}

// ============================================================================
// Page Planning Tests
// ============================================================================

#[test_case(1, 0 => 0 ; "single page, all requested")]
#[test_case(1, 1 => 0 ; "single page, one requested")]
#[test_case(1, 9 => 0 ; "single page, many requested")]
#[test_case(0, 0 => 0 ; "empty collection")]
#[test_case(5, 0 => 5 ; "all pages")]
#[test_case(5, 1 => 0 ; "first page only")]
#[test_case(5, 3 => 3 ; "fewer than available")]
#[test_case(5, 500 => 5 ; "more than available")]
fn test_pages_to_fetch(pages: u32, requested: i64) -> u32 {
    pages_to_fetch(&paging(100, 1, 20, pages), requested).unwrap()
}

#[test]
fn test_pages_to_fetch_negative() {
    let err = pages_to_fetch(&paging(100, 1, 20, 5), -1).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = pages_to_fetch(&paging(1, 1, 20, 1), -3).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_discovery_remaining() {
    let discovery = Discovery {
        first: envelope(1, &[]),
        pages_to_fetch: 4,
    };
    pretty_assertions::assert_eq!(discovery.remaining().collect::<Vec<_>>(), vec![2, 3, 4]);

    let discovery = Discovery {
        first: envelope(1, &[]),
        pages_to_fetch: 0,
    };
    pretty_assertions::assert_eq!(discovery.remaining().count(), 0);
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_orders_by_page() {
    let first = envelope(1, &[1, 2]);
    let rest = vec![indexed(3, &[5, 6]), indexed(2, &[3, 4])];

    let ids: Vec<u32> = merge(first, rest).into_iter().map(|w| w.id).collect();
    pretty_assertions::assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_merge_invariant_under_arrival_order() {
    let arrivals: [[u32; 3]; 6] = [
        [2, 3, 4],
        [2, 4, 3],
        [3, 2, 4],
        [3, 4, 2],
        [4, 2, 3],
        [4, 3, 2],
    ];

    let mut outputs = Vec::new();
    for order in arrivals {
        let rest = order
            .iter()
            .map(|&page| indexed(page, &[page * 10, page * 10 + 1]))
            .collect();
        let merged: Vec<u32> = merge(envelope(1, &[1]), rest)
            .into_iter()
            .map(|w| w.id)
            .collect();
        outputs.push(merged);
    }

    let expected = vec![1, 20, 21, 30, 31, 40, 41];
    for output in outputs {
        pretty_assertions::assert_eq!(output, expected);
    }
}

#[test]
fn test_merge_keeps_duplicates_and_short_pages() {
    let mut first = envelope(1, &[1, 2, 3]);
    first.paging = paging(7, 1, 3, 3);
    let rest = vec![indexed(2, &[3, 4, 5]), indexed(3, &[6])];

    let ids: Vec<u32> = merge(first, rest).into_iter().map(|w| w.id).collect();
    pretty_assertions::assert_eq!(ids, vec![1, 2, 3, 3, 4, 5, 6]);
}

#[test]
fn test_merge_first_only() {
    let items = merge(envelope(1, &[9]), Vec::new());
    pretty_assertions::assert_eq!(items, vec![Widget { id: 9 }]);
}

// ============================================================================
// Discover Tests
// ============================================================================

#[tokio::test]
async fn test_discover_fetches_first_page_without_page_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 3, 50, 0..20)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut executor = client_for(&mock_server, 4).executor();
    let request = FetchRequest::get("/v1/widgets").query("page", "7");

    let discovery = discover::<Widget>(&mut executor, &request, 0).await.unwrap();
    pretty_assertions::assert_eq!(discovery.pages_to_fetch, 3);
    pretty_assertions::assert_eq!(discovery.first.items.len(), 20);
}

#[tokio::test]
async fn test_discover_negative_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut executor = client_for(&mock_server, 4).executor();
    let err = discover::<Widget>(&mut executor, &FetchRequest::get("/v1/widgets"), -2)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_discover_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such collection"))
        .mount(&mock_server)
        .await;

    let mut executor = client_for(&mock_server, 4).executor();
    let err = discover::<Widget>(&mut executor, &FetchRequest::get("/v1/widgets"), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

// ============================================================================
// Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_pages_reorders_by_page() {
    let mock_server = MockServer::start().await;

    // later pages answer first
    mount_page(&mock_server, 2, page_body(2, 4, 80, 20..40), 150).await;
    mount_page(&mock_server, 3, page_body(3, 4, 80, 40..60), 75).await;
    mount_page(&mock_server, 4, page_body(4, 4, 80, 60..65), 0).await;

    let client = client_for(&mock_server, 8);
    let pages = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 4)
        .await
        .unwrap();

    let order: Vec<u32> = pages.iter().map(|p| p.page).collect();
    pretty_assertions::assert_eq!(order, vec![2, 3, 4]);
    pretty_assertions::assert_eq!(pages[0].envelope.items[0], Widget { id: 20 });
    pretty_assertions::assert_eq!(pages[2].envelope.items.len(), 5);
}

#[tokio::test]
async fn test_fetch_pages_merge_stable_across_completion_orders() {
    let delay_sets: [[u64; 3]; 3] = [[0, 40, 80], [80, 40, 0], [40, 0, 80]];

    let mut results = Vec::new();
    for delays in delay_sets {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/widgets.json"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 4, 70, 0..20)))
            .mount(&mock_server)
            .await;
        for (offset, delay) in delays.iter().enumerate() {
            let page = offset as u32 + 2;
            let start = page * 20 - 20;
            let end = if page == 4 { start + 10 } else { start + 20 };
            mount_page(&mock_server, page, page_body(page, 4, 70, start..end), *delay).await;
        }

        let client = client_for(&mock_server, 8);
        let request = FetchRequest::get("/v1/widgets");
        let mut executor = client.executor();
        let discovery = discover::<Widget>(&mut executor, &request, 0).await.unwrap();
        let rest = fetch_pages::<Widget>(&client, &request, 2, discovery.pages_to_fetch)
            .await
            .unwrap();
        let ids: Vec<u32> = merge(discovery.first, rest).into_iter().map(|w| w.id).collect();
        results.push(ids);
    }

    let expected: Vec<u32> = (0..70).collect();
    for ids in results {
        pretty_assertions::assert_eq!(ids, expected);
    }
}

#[tokio::test]
async fn test_fetch_pages_with_concurrency_of_one() {
    let mock_server = MockServer::start().await;

    for page in 2..=5 {
        mount_page(&mock_server, page, page_body(page, 5, 100, page..page + 1), 5).await;
    }

    let client = client_for(&mock_server, 1);
    let pages = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 5)
        .await
        .unwrap();

    let ids: Vec<u32> = pages.iter().map(|p| p.envelope.items[0].id).collect();
    pretty_assertions::assert_eq!(ids, vec![2, 3, 4, 5]);
}

#[tokio::test]
async fn test_fetch_pages_first_error_wins() {
    let mock_server = MockServer::start().await;

    // page 2 may still be in flight when the fetch gives up, so no expectation on it
    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, 3, 60, 20..40)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database on fire"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 4);
    let err = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 3)
        .await
        .unwrap_err();

    match err {
        Error::PartialFetch { page, source } => {
            pretty_assertions::assert_eq!(page, 3);
            assert!(matches!(*source, Error::HttpStatus { status: 500, .. }));
        }
        other => panic!("expected PartialFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_pages_decode_error_is_partial_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"widgets\": []}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 4);
    let err = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 2)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PartialFetch { page: 2, .. }));
    assert!(matches!(err.root(), Error::Decode { .. }));
}

#[tokio::test]
async fn test_fetch_pages_absorbs_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/widgets.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Rate Limit Exceeded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 2, page_body(2, 2, 30, 20..30), 0).await;

    let client = client_for(&mock_server, 4);
    let pages = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 2)
        .await
        .unwrap();

    pretty_assertions::assert_eq!(pages.len(), 1);
    pretty_assertions::assert_eq!(pages[0].envelope.items.len(), 10);
}

#[tokio::test]
async fn test_fetch_pages_empty_range() {
    let client = HttpClient::new(ClientConfig::default()).unwrap();
    let pages = fetch_pages::<Widget>(&client, &FetchRequest::get("/v1/widgets"), 2, 1)
        .await
        .unwrap();
    assert!(pages.is_empty());
}
