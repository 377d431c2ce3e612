//! Query submission state machine

use super::error::SearchError;
use super::models::{SearchRequest, SearchResponse};
use crate::metrics::{Metrics, Outcome};
use crate::network::SearchTransport;
use crate::results::{FacultyResult, Normalizer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of the current search. Exactly one is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight; no results are visible
    Loading,
    /// The service returned at least one result
    Loaded(Vec<FacultyResult>),
    /// The service returned no usable results
    Empty,
    /// The service could not be reached or answered with an error
    Failed(SearchError),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn results(&self) -> &[FacultyResult] {
        match self {
            SearchState::Loaded(results) => results,
            _ => &[],
        }
    }
}

/// A request that has been issued but not yet applied
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Monotonic per-controller id, used for logging only
    pub id: u64,
    pub request: SearchRequest,
    pub started: Instant,
}

/// Holds the query and the search state, and applies dispatch lifecycle
/// events to them.
///
/// Overlapping dispatches are not ordered: every completion is applied as it
/// arrives, so the last response to land decides what is shown, even if it
/// belongs to an older query.
pub struct SearchController {
    query: String,
    state: SearchState,
    has_searched: bool,
    service_message: Option<String>,
    next_id: u64,
    in_flight: usize,
    normalizer: Normalizer,
    metrics: Arc<Metrics>,
}

impl SearchController {
    pub fn new(normalizer: Normalizer) -> Self {
        Self::with_metrics(normalizer, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(normalizer: Normalizer, metrics: Arc<Metrics>) -> Self {
        Self {
            query: String::new(),
            state: SearchState::Idle,
            has_searched: false,
            service_message: None,
            next_id: 1,
            in_flight: 0,
            normalizer,
            metrics,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Current result set; empty in every state but `Loaded`
    pub fn results(&self) -> &[FacultyResult] {
        self.state.results()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Advisory text attached to the last applied response
    pub fn service_message(&self) -> Option<&str> {
        self.service_message.as_deref()
    }

    /// Dispatches issued but not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Start a submission: enter `Loading`, clear visible results and hand
    /// back the request to send. A blank query changes nothing.
    pub fn begin_submit(&mut self) -> Result<Dispatch, SearchError> {
        if self.query.trim().is_empty() {
            debug!("Ignoring blank query");
            self.metrics.inc_ignored();
            return Err(SearchError::EmptyQuery);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.in_flight += 1;

        self.state = SearchState::Loading;
        self.has_searched = true;
        self.service_message = None;
        self.metrics.inc_submission();

        if self.in_flight > 1 {
            debug!(
                "Dispatch #{} overlaps {} earlier request(s)",
                id,
                self.in_flight - 1
            );
        }
        info!("Dispatch #{}: searching for {:?}", id, self.query);

        Ok(Dispatch {
            id,
            request: SearchRequest::new(self.query.clone()),
            started: Instant::now(),
        })
    }

    /// Apply the outcome of a dispatch. Always leaves `Loading`.
    pub fn complete(
        &mut self,
        dispatch: Dispatch,
        outcome: Result<SearchResponse, SearchError>,
    ) -> &SearchState {
        self.in_flight = self.in_flight.saturating_sub(1);
        let elapsed = dispatch.started.elapsed();

        let (state, recorded, message) = match outcome {
            Ok(response) => {
                let results = match response.records() {
                    Some(records) => self.normalizer.normalize_all(records),
                    None => {
                        warn!(
                            "Dispatch #{}: response has no results array, treating as empty",
                            dispatch.id
                        );
                        Vec::new()
                    }
                };
                if results.is_empty() {
                    info!("Dispatch #{}: no matches in {:?}", dispatch.id, elapsed);
                    (SearchState::Empty, Outcome::Empty, response.message)
                } else {
                    info!(
                        "Dispatch #{}: {} result(s) in {:?}",
                        dispatch.id,
                        results.len(),
                        elapsed
                    );
                    (
                        SearchState::Loaded(results),
                        Outcome::Loaded,
                        response.message,
                    )
                }
            }
            Err(e) => {
                warn!("Dispatch #{} failed: {}", dispatch.id, e);
                (SearchState::Failed(e), Outcome::Failed, None)
            }
        };
        self.metrics.record(recorded, elapsed);

        self.state = state;
        self.service_message = message;
        &self.state
    }

    /// Submit the current query through `transport` and wait for the answer.
    ///
    /// Returns whether a request was dispatched.
    pub async fn submit<T>(&mut self, transport: &T) -> bool
    where
        T: SearchTransport + ?Sized,
    {
        let dispatch = match self.begin_submit() {
            Ok(dispatch) => dispatch,
            Err(_) => return false,
        };

        let outcome = transport.search(&dispatch.request).await;
        self.complete(dispatch, outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResultSettings;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes and records every request it sees
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<SearchResponse, SearchError>>>,
        seen: Mutex<Vec<SearchRequest>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Result<SearchResponse, SearchError>) -> Self {
            let transport = Self::default();
            transport.replies.lock().unwrap().push_back(reply);
            transport
        }

        fn seen(&self) -> Vec<SearchRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchTransport for ScriptedTransport {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SearchError::Transport("no reply scripted".into())))
        }
    }

    fn controller() -> SearchController {
        SearchController::new(Normalizer::new(&ResultSettings::default()))
    }

    fn body(value: serde_json::Value) -> Result<SearchResponse, SearchError> {
        Ok(SearchResponse::from_value(value))
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.state(), &SearchState::Idle);
        assert!(!c.has_searched());
        assert!(!c.is_loading());
        assert!(c.results().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        for query in ["", "   ", "\t\n"] {
            let transport = ScriptedTransport::default();
            let mut c = controller();
            c.set_query(query);

            assert!(!c.submit(&transport).await);
            assert!(transport.seen().is_empty());
            assert_eq!(c.state(), &SearchState::Idle);
            assert!(!c.has_searched());
            assert_eq!(c.metrics().snapshot().ignored, 1);
        }
    }

    #[tokio::test]
    async fn test_blank_query_keeps_previous_results() {
        let transport = ScriptedTransport::replying(body(json!({
            "results": [{ "name": "A", "score": 0.5 }]
        })));
        let mut c = controller();
        c.set_query("robotics");
        c.submit(&transport).await;

        c.set_query("  ");
        assert!(matches!(c.begin_submit(), Err(SearchError::EmptyQuery)));
        assert_eq!(c.results().len(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_query() {
        let transport = ScriptedTransport::replying(body(json!({ "results": [] })));
        let mut c = controller();
        c.set_query("machine learning");

        assert!(c.submit(&transport).await);
        assert_eq!(transport.seen(), vec![SearchRequest::new("machine learning")]);
    }

    #[test]
    fn test_begin_submit_enters_loading_and_clears_results() {
        let mut c = controller();
        c.set_query("graphs");
        let first = c.begin_submit().unwrap();
        c.complete(first, body(json!({ "results": [{ "name": "A" }] })));
        assert_eq!(c.results().len(), 1);

        c.set_query("compilers");
        let dispatch = c.begin_submit().unwrap();
        assert!(c.is_loading());
        assert!(c.has_searched());
        assert!(c.results().is_empty());
        assert_eq!(dispatch.request.query, "compilers");
        assert_eq!(c.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_loaded_preserves_order() {
        let transport = ScriptedTransport::replying(body(json!({
            "results": [
                { "name": "Dr. Asha Mehta", "specialization": "Machine learning", "score": 0.82,
                  "image_url": "/img/a.jpg", "profile_url": "https://www.daiict.ac.in/faculty/a" },
                { "name": "Dr. Vikram Rao", "specialization": "Deep learning", "score": 0.614,
                  "image_url": "https://cdn.example.org/v.jpg", "profile_url": "https://www.daiict.ac.in/faculty/v" }
            ]
        })));
        let mut c = controller();
        c.set_query("machine learning");
        c.submit(&transport).await;

        let results = c.results();
        assert!(matches!(c.state(), SearchState::Loaded(_)));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Dr. Asha Mehta");
        assert_eq!(results[0].match_percent(), 82);
        assert_eq!(results[1].name, "Dr. Vikram Rao");
        assert_eq!(results[1].match_percent(), 61);
        assert!(!c.is_loading());
    }

    #[tokio::test]
    async fn test_empty_array_is_empty() {
        let transport = ScriptedTransport::replying(body(json!({ "results": [] })));
        let mut c = controller();
        c.set_query("zyxquantumfoo");
        c.submit(&transport).await;

        assert_eq!(c.state(), &SearchState::Empty);
        assert!(c.results().is_empty());
        assert!(c.has_searched());
        assert!(!c.is_loading());
    }

    #[tokio::test]
    async fn test_missing_or_invalid_results_is_empty() {
        for value in [
            json!({}),
            json!({ "results": null }),
            json!({ "results": "oops" }),
            json!({ "results": { "name": "A" } }),
            json!([{ "name": "A" }]),
        ] {
            let transport = ScriptedTransport::replying(body(value.clone()));
            let mut c = controller();
            c.set_query("vision");
            c.submit(&transport).await;

            assert_eq!(c.state(), &SearchState::Empty, "body: {}", value);
            assert!(c.results().is_empty());
            assert!(!c.is_loading());
        }
    }

    #[tokio::test]
    async fn test_service_message_is_kept() {
        let transport = ScriptedTransport::replying(body(json!({
            "results": [], "message": "AI Timeout"
        })));
        let mut c = controller();
        c.set_query("nlp");
        c.submit(&transport).await;

        assert_eq!(c.state(), &SearchState::Empty);
        assert_eq!(c.service_message(), Some("AI Timeout"));
    }

    #[tokio::test]
    async fn test_failures_end_in_failed() {
        for error in [
            SearchError::Status(502),
            SearchError::Transport("connection refused".into()),
            SearchError::MalformedResponse("expected value".into()),
        ] {
            let transport = ScriptedTransport::replying(Err(error.clone()));
            let mut c = controller();
            c.set_query("security");
            c.submit(&transport).await;

            assert_eq!(c.state(), &SearchState::Failed(error));
            assert!(c.results().is_empty());
            assert!(!c.is_loading());
            assert_eq!(transport.seen().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_failure_replaces_previous_results() {
        let transport = ScriptedTransport::default();
        {
            let mut replies = transport.replies.lock().unwrap();
            replies.push_back(body(json!({ "results": [{ "name": "A" }] })));
            replies.push_back(Err(SearchError::Status(503)));
        }
        let mut c = controller();
        c.set_query("a");
        c.submit(&transport).await;
        c.set_query("b");
        c.submit(&transport).await;

        assert_eq!(c.state(), &SearchState::Failed(SearchError::Status(503)));
        assert!(c.results().is_empty());
        assert!(c.has_searched());
    }

    #[test]
    fn test_overlapping_dispatches_last_arrival_wins() {
        let mut c = controller();
        c.set_query("first");
        let first = c.begin_submit().unwrap();
        c.set_query("second");
        let second = c.begin_submit().unwrap();
        assert!(second.id > first.id);
        assert_eq!(c.in_flight(), 2);

        // Newer query answers first, the older one lands last and wins
        c.complete(second, body(json!({ "results": [{ "name": "Second" }] })));
        assert!(!c.is_loading());
        assert_eq!(c.in_flight(), 1);

        c.complete(first, body(json!({ "results": [] })));
        assert_eq!(c.state(), &SearchState::Empty);
        assert_eq!(c.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_metrics_track_outcomes() {
        let transport = ScriptedTransport::default();
        {
            let mut replies = transport.replies.lock().unwrap();
            replies.push_back(body(json!({ "results": [{ "name": "A" }] })));
            replies.push_back(body(json!({ "results": [] })));
            replies.push_back(Err(SearchError::Status(500)));
        }
        let mut c = controller();
        c.set_query("q");
        for _ in 0..3 {
            c.submit(&transport).await;
        }

        let snapshot = c.metrics().snapshot();
        assert_eq!(snapshot.submissions, 3);
        assert_eq!(snapshot.loaded, 1);
        assert_eq!(snapshot.empty, 1);
        assert_eq!(snapshot.failed, 1);
    }
}
