//! Integration tests for cirrus-search.
//!
//! Drives the public search API against an in-memory backend and checks the requests it
//! receives and the results shaped from its responses.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cirrus_config::Config;
use cirrus_search::{
    BackendError, ConcurrencyGate, CrossSearchStrategy, HitSource, IndexTarget, ResultShape,
    SearchBackend, SearchClient, SearchError, SearchOutcome, SearchParams, SearchRequest,
    SearchResponse, SearchResult,
};
use serde_json::{Value, json};
use tokio::time;
use tracing_subscriber::EnvFilter;

/// In-memory backend returning a canned response.
struct FakeBackend {
    /// Requests received, in order.
    requests: Mutex<Vec<SearchRequest>>,
    /// Response body for every search.
    response: Value,
    /// Artificial latency per search.
    delay: Duration,
    /// Searches currently running.
    running: AtomicUsize,
    /// Highest number of simultaneous searches seen.
    peak: AtomicUsize,
}

impl FakeBackend {
    fn new(response: Value) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response,
            delay: Duration::ZERO,
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(
        &self,
        _target: IndexTarget,
        request: SearchRequest,
    ) -> Result<SearchResponse, BackendError> {
        self.requests.lock().unwrap().push(request);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            time::sleep(self.delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
        SearchResponse::from_json(self.response.clone())
    }

    async fn get(
        &self,
        _target: IndexTarget,
        _id: u64,
        _fields: Vec<String>,
    ) -> Result<Option<HitSource>, BackendError> {
        Ok(None)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn client_for(backend: &Arc<FakeBackend>) -> SearchClient {
    SearchClient::new(Arc::clone(backend) as Arc<dyn SearchBackend>, Config::default())
}

fn empty_response() -> Value {
    json!({"hits": {"total": 0, "hits": []}})
}

#[tokio::test]
async fn category_and_words_end_to_end() {
    init_tracing();
    let backend = Arc::new(FakeBackend::new(json!({
        "hits": {
            "total": {"value": 1},
            "hits": [{
                "_id": "12",
                "_score": 4.0,
                "_source": {
                    "namespace": 0,
                    "title": "Hello",
                    "redirect": [
                        {"namespace": 1, "title": "Hi there"},
                        {"namespace": 0, "title": "Hi there"}
                    ],
                    "text": "Hello is a greeting.",
                    "text_words": 4,
                    "text_bytes": 20
                },
                "highlight": {
                    "redirect.title": ["<span class=\"searchmatch\">Hi</span> there"],
                    "text": ["<span class=\"searchmatch\">Hello</span> & <b>"]
                }
            }]
        },
        "suggest": {
            "suggest": [{"text": "hello", "options": [
                {"text": "hullo", "highlighted": "<em>hullo</em>", "score": 0.3}
            ]}]
        }
    })));
    let client = client_for(&backend);

    let outcome = client
        .searcher(SearchParams::new(0, 20))
        .search_text("incategory:\"Foo\" hello", true)
        .await;

    let request = backend.requests().pop().unwrap();
    let body = request.to_json();
    let inner = &body["query"]["function_score"]["query"]["bool"];
    assert_eq!(inner["filter"], json!([{"match": {"category": "Foo"}}]));
    assert_eq!(inner["must"][0]["query_string"]["query"], "hello");
    assert_eq!(body["suggest"]["text"], "hello");
    assert!(body["suggest"]["suggest"].is_object());
    assert!(body["suggest"]["suggest-redirect"].is_object());
    assert_eq!(body["size"], 20);
    assert!(body.get("from").is_none());

    let results = outcome.results().unwrap();
    assert_eq!(results.total_hits, 1);
    assert_eq!(results.cross_search_strategy, CrossSearchStrategy::HostWikiOnly);

    let SearchResult::FullText(hit) = &results.results[0] else {
        panic!("expected a full text result");
    };
    assert_eq!(hit.redirect_title.as_deref(), Some("Hi there"));
    assert_eq!(hit.redirect_namespace, Some(0));
    assert_eq!(
        hit.text_snippet,
        "<span class=\"searchmatch\">Hello</span> &amp; &lt;b&gt;"
    );
    assert_eq!(hit.word_count, Some(4));
    assert_eq!(hit.byte_size, Some(20));

    let suggestion = results.suggestion.as_ref().unwrap();
    assert_eq!(suggestion.query, "incategory:\"Foo\" hullo");
    assert_eq!(suggestion.snippet, "incategory:&quot;Foo&quot; <em>hullo</em>");
}

#[tokio::test]
async fn prefix_length_boundary() {
    let backend = Arc::new(FakeBackend::new(empty_response()));
    let client = client_for(&backend);
    let params = SearchParams::default().with_shape(ResultShape::TitleOnly);

    let at_limit = client
        .searcher(params.clone())
        .prefix_search(&"x".repeat(255))
        .await;
    assert!(matches!(at_limit, Ok(SearchOutcome::Results(_))));

    let over_limit = client
        .searcher(params)
        .prefix_search(&"x".repeat(256))
        .await
        .unwrap_err();
    assert_eq!(over_limit.http_status(), 400);
    assert!(matches!(over_limit, SearchError::RequestTooLong { length: 256, .. }));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn malformed_keywords_stay_literal() {
    let backend = Arc::new(FakeBackend::new(empty_response()));
    let client = client_for(&backend);

    client
        .searcher(SearchParams::default())
        .search_text("incategory: foo:bar", false)
        .await;

    let body = backend.requests().pop().unwrap().to_json();
    let query = &body["query"]["function_score"]["query"]["query_string"]["query"];
    assert_eq!(query, "incategory\\: foo\\:bar");
}

#[tokio::test]
async fn gate_bounds_concurrent_searches() {
    let backend =
        Arc::new(FakeBackend::new(empty_response()).with_delay(Duration::from_millis(20)));
    let client = client_for(&backend)
        .with_gate(ConcurrencyGate::new("test", 2, Duration::from_secs(5)));

    let mut handles = Vec::new();
    for i in 0..6 {
        let searcher = client.searcher(SearchParams::default());
        handles.push(tokio::spawn(async move {
            searcher.search_text(&format!("query {i}"), false).await
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().is_warning());
    }

    assert_eq!(backend.requests().len(), 6);
    assert!(backend.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(client.gate().in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out_as_warning() {
    let backend =
        Arc::new(FakeBackend::new(empty_response()).with_delay(Duration::from_secs(60)));
    let client = client_for(&backend)
        .with_gate(ConcurrencyGate::new("slow", 1, Duration::from_millis(100)));

    let outcome = client
        .searcher(SearchParams::default())
        .search_text("hello", false)
        .await;

    let SearchOutcome::Warning(status) = outcome else {
        panic!("expected a warning");
    };
    assert_eq!(status.message_key, "cirrussearch-backend-error");
    assert_eq!(status.description, "full text search for 'hello'");
    assert!(status.detail.contains("timed out"));
    assert_eq!(client.gate().in_flight(), 0);
}

#[tokio::test]
async fn more_like_this_missing_document() {
    let backend = Arc::new(FakeBackend::new(empty_response()));
    let client = client_for(&backend);

    assert!(
        client
            .searcher(SearchParams::default())
            .more_like_this(99)
            .await
            .is_none()
    );
    assert!(backend.requests().is_empty());
}
