//! Integration tests for the harvesting pipeline
//!
//! These run the real client, pager, batch processor, and sink against a
//! wiremock catalog stub: rate gating, retry exhaustion, rate-limit
//! recovery, pagination stop/abort, and the end-to-end harvest.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use umh_core::api::UmodClient;
use umh_core::harvest::{Harvester, PageFetcher};
use umh_core::HarvestConfig;

fn test_config(server: &MockServer) -> HarvestConfig {
    let mut config = HarvestConfig::fast();
    config.set_base_url(server.uri());
    config
}

/// Search page body with one record per (slug, name) pair.
fn search_body(records: &[(&str, &str)], last_page: u32) -> serde_json::Value {
    let data: Vec<serde_json::Value> = records
        .iter()
        .map(|(slug, name)| {
            serde_json::json!({
                "slug": slug,
                "name": name,
                "author": "tester",
                "downloads": 12,
                "latest_release_version": "1.0.0",
                "category_tags": "admin,fun",
                "created_at": "2023-01-15 08:30:00",
                "updated_at": "2023-02-20 19:45:10"
            })
        })
        .collect();
    serde_json::json!({ "data": data, "last_page": last_page })
}

fn empty_body() -> serde_json::Value {
    serde_json::json!({ "data": [], "last_page": 10 })
}

/// How long the gate test holds each stubbed response open.
const GATED_RESPONSE_DELAY: Duration = Duration::from_millis(200);

/// Responder that records when each request reached the server before
/// holding the response open for a fixed delay.
struct ArrivalLog {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    body: serde_json::Value,
}

impl Respond for ArrivalLog {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200)
            .set_body_json(self.body.clone())
            .set_delay(GATED_RESPONSE_DELAY)
    }
}

#[tokio::test]
async fn test_rate_gate_bounds_request_concurrency() {
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(ArrivalLog {
            arrivals: arrivals.clone(),
            body: search_body(&[("a", "A")], 1),
        })
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_inflight_requests = 2;
    let client = UmodClient::new(&config).unwrap();

    let calls: Vec<_> = (0..6)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.search_page(1, 10).await })
        })
        .collect();
    for call in calls {
        call.await.unwrap().unwrap();
    }

    // Every response stays open for the full delay, so a request arriving
    // while two earlier ones are still unanswered means three were in
    // flight at once. Peak in-flight count at each arrival must stay at or
    // below the gate width.
    let mut arrivals = arrivals.lock().unwrap().clone();
    arrivals.sort();
    assert_eq!(arrivals.len(), 6);

    let mut peak = 0usize;
    for (i, arrival) in arrivals.iter().enumerate() {
        let in_flight = arrivals[..=i]
            .iter()
            .filter(|earlier| **earlier + GATED_RESPONSE_DELAY > *arrival)
            .count();
        peak = peak.max(in_flight);
    }
    assert!(
        peak <= 2,
        "observed {peak} concurrent requests through a two-wide gate"
    );
}

#[tokio::test]
async fn test_transient_errors_are_attempted_exactly_max_attempts_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = UmodClient::new(&config).unwrap();

    let err = client.search_page(1, 10).await.unwrap_err();
    assert!(err.is_retries_exhausted(), "unexpected error: {err}");
    // the .expect(3) on the mock verifies the attempt count on drop
}

#[tokio::test]
async fn test_rate_limit_response_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[("a", "A")], 1)))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = UmodClient::new(&config).unwrap();

    let page = client.search_page(1, 10).await.unwrap();
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn test_pagination_stops_done_on_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[("a", "A")], 10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[("b", "B")], 10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_pages = 5;
    let client = UmodClient::new(&config).unwrap();

    let outcome = PageFetcher::new(&client, &config)
        .fetch_all(&CancellationToken::new())
        .await;

    assert!(!outcome.aborted);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn test_pagination_abort_preserves_prior_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(&[("a", "A"), ("b", "B")], 10)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.max_pages = 5;
    let client = UmodClient::new(&config).unwrap();

    let outcome = PageFetcher::new(&client, &config)
        .fetch_all(&CancellationToken::new())
        .await;

    assert!(outcome.aborted);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn test_pagination_respects_configured_page_ceiling() {
    let server = MockServer::start().await;
    for page in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path("/plugins/search.json"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_body(&[("a", "A")], 100)),
            )
            .mount(&server)
            .await;
    }

    let mut config = test_config(&server);
    config.max_pages = 2;
    let client = UmodClient::new(&config).unwrap();

    let outcome = PageFetcher::new(&client, &config)
        .fetch_all(&CancellationToken::new())
        .await;

    // Server reports 100 pages but the ceiling clamps at 2.
    assert!(!outcome.aborted);
    assert_eq!(outcome.pages_fetched, 2);
}

#[tokio::test]
async fn test_end_to_end_harvest_skips_invalid_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(
            &[("a", "A"), ("", "B"), ("c", "C")],
            1,
        )))
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server);
    config.output_dir = output.path().to_path_buf();
    config.max_pages = 1;
    config.batch_size = 3;
    config.worker_count = 2;

    let harvester = Harvester::new(config).unwrap();
    let summary = harvester.run(&CancellationToken::new()).await;

    assert_eq!(summary.records_fetched, 3);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
    assert!(!summary.aborted);

    assert!(output.path().join("a.json").exists());
    assert!(output.path().join("c.json").exists());
    assert!(!output.path().join("b.json").exists());

    let snapshot = harvester.snapshot();
    assert_eq!(snapshot.file_count, 2);

    let saved = std::fs::read_to_string(output.path().join("a.json")).unwrap();
    assert!(saved.contains("\"name\": \"A\""));
    assert!(saved.contains("\"latest_version\": \"1.0.0\""));
    assert!(saved.contains("/plugins/a/download/latest"));
}

#[tokio::test]
async fn test_end_to_end_rerun_overwrites_existing_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plugins/search.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_body(&[("a", "Renamed A")], 1)),
        )
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    std::fs::write(output.path().join("a.json"), "{\"name\": \"Old A\"}").unwrap();

    let mut config = test_config(&server);
    config.output_dir = output.path().to_path_buf();
    config.max_pages = 1;

    let harvester = Harvester::new(config).unwrap();
    let summary = harvester.run(&CancellationToken::new()).await;
    assert_eq!(summary.saved, 1);

    let files: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(output.path().join("a.json")).unwrap();
    assert!(content.contains("Renamed A"));
    assert!(!content.contains("Old A"));
}
