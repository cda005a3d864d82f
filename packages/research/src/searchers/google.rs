//! Google Custom Search JSON API client.
//!
//! The API returns at most ten items per call, so larger searches walk the
//! result list with the 1-based `start` offset, one request at a time.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::security::SearchCredentials;
use crate::traits::searcher::{SearchOutcome, SearchResult, SearchStop, TimeWindow, WebSearcher};
use crate::traits::transport::{HttpRequest, HttpTransport};

/// Public endpoint of the Custom Search JSON API.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Items returned per request.
pub const PAGE_SIZE: usize = 10;

/// The API refuses offsets past the first hundred results.
pub const MAX_RESULTS: usize = 100;

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Option<Vec<GoogleItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl GoogleItem {
    /// Items without a usable link are dropped rather than passed on with
    /// an empty URL.
    fn into_result(self) -> Option<SearchResult> {
        let url = self.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())?;
        Some(SearchResult::new(
            self.title.unwrap_or_default(),
            url,
            self.snippet.unwrap_or_default(),
        ))
    }
}

/// Paginating Google Custom Search client.
///
/// # Example
///
/// ```rust,ignore
/// let transport = Arc::new(ReqwestTransport::new()?);
/// let searcher = GoogleSearcher::new(transport, SearchCredentials::new(key, cx));
/// let results = searcher.search("rust web scraping", 25, TimeWindow::Month).await;
/// ```
pub struct GoogleSearcher {
    transport: Arc<dyn HttpTransport>,
    credentials: SearchCredentials,
    endpoint: String,
}

impl GoogleSearcher {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: SearchCredentials) -> Self {
        Self {
            transport,
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point the client at another endpoint (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn page_request(&self, query: &str, num: usize, start: usize, window: TimeWindow) -> HttpRequest {
        let mut request = HttpRequest::get(&self.endpoint)
            .with_query("key", self.credentials.api_key.expose())
            .with_query("cx", &self.credentials.engine_id)
            .with_query("q", query)
            .with_query("num", num.to_string());
        if let Some(token) = window.date_restrict() {
            request = request.with_query("dateRestrict", token);
        }
        request.with_query("start", start.to_string())
    }

    async fn fetch_page(&self, request: &HttpRequest) -> FetchResult<Vec<GoogleItem>> {
        let response = self.transport.get(request).await?.error_for_status()?;
        let page: GoogleResponse =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Http(Box::new(e)))?;
        Ok(page.items.unwrap_or_default())
    }
}

#[async_trait]
impl WebSearcher for GoogleSearcher {
    async fn search_detailed(
        &self,
        query: &str,
        max_results: usize,
        window: TimeWindow,
    ) -> SearchOutcome {
        let max_results = max_results.min(MAX_RESULTS);
        let mut results: Vec<SearchResult> = Vec::with_capacity(max_results);
        let mut requests = 0;

        if max_results == 0 || query.trim().is_empty() {
            debug!(max_results, "Empty search request, not calling provider");
            return SearchOutcome {
                results,
                requests,
                stop: SearchStop::Exhausted,
            };
        }

        let num = max_results.min(PAGE_SIZE);
        let mut stop = SearchStop::Exhausted;
        let mut start = 1;

        info!(query = %query, max_results, window = %window, "Google search starting");

        while results.len() < max_results && start <= MAX_RESULTS {
            let request = self.page_request(query, num, start, window);
            requests += 1;

            let items = match self.fetch_page(&request).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(query = %query, start, error = %e, "Search request failed, keeping partial results");
                    stop = SearchStop::Failed(e.to_string());
                    break;
                }
            };

            if items.is_empty() {
                debug!(query = %query, start, "Provider returned no further items");
                break;
            }

            let before = results.len();
            results.extend(items.into_iter().filter_map(GoogleItem::into_result));
            debug!(start, added = results.len() - before, "Search page collected");

            // Contiguous pages: the next page begins right after this one
            start += num;
        }

        if results.len() >= max_results {
            results.truncate(max_results);
            stop = SearchStop::Filled;
        }

        info!(
            query = %query,
            results = results.len(),
            requests,
            stop = ?stop,
            "Google search finished"
        );

        SearchOutcome {
            results,
            requests,
            stop,
        }
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{google_page, MockTransport};

    const ENDPOINT: &str = "https://search.test/customsearch/v1";

    fn searcher(transport: &MockTransport) -> GoogleSearcher {
        GoogleSearcher::new(
            Arc::new(transport.clone()),
            SearchCredentials::new("test-key", "test-cx"),
        )
        .with_endpoint(ENDPOINT)
    }

    #[tokio::test]
    async fn test_paginates_with_start_offsets() {
        let transport = MockTransport::new()
            .with_body(ENDPOINT, google_page(0, 10))
            .with_body(ENDPOINT, google_page(10, 10))
            .with_body(ENDPOINT, google_page(20, 10));

        let outcome = searcher(&transport)
            .search_detailed("rust", 25, TimeWindow::Any)
            .await;

        assert_eq!(outcome.results.len(), 25);
        assert_eq!(outcome.requests, 3);
        assert_eq!(outcome.stop, SearchStop::Filled);

        let starts: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r.query_param("start").unwrap().to_string())
            .collect();
        assert_eq!(starts, vec!["1", "11", "21"]);

        // Provider order is preserved across pages
        assert_eq!(outcome.results[0].url, "https://result.example/0");
        assert_eq!(outcome.results[24].url, "https://result.example/24");
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let transport = MockTransport::new().with_body(ENDPOINT, google_page(0, 5));

        searcher(&transport)
            .search("climate policy", 5, TimeWindow::Week)
            .await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, ENDPOINT);
        assert_eq!(request.query_param("key"), Some("test-key"));
        assert_eq!(request.query_param("cx"), Some("test-cx"));
        assert_eq!(request.query_param("q"), Some("climate policy"));
        assert_eq!(request.query_param("num"), Some("5"));
        assert_eq!(request.query_param("dateRestrict"), Some("w1"));
        assert_eq!(request.query_param("start"), Some("1"));
    }

    #[tokio::test]
    async fn test_any_window_sends_no_date_restrict() {
        let transport = MockTransport::new().with_body(ENDPOINT, google_page(0, 3));

        searcher(&transport).search("q", 3, TimeWindow::Any).await;

        assert_eq!(transport.requests()[0].query_param("dateRestrict"), None);
    }

    #[tokio::test]
    async fn test_truncates_overshooting_page() {
        let transport = MockTransport::new().with_body(ENDPOINT, google_page(0, 10));

        let results = searcher(&transport).search("q", 7, TimeWindow::Any).await;

        assert_eq!(results.len(), 7);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stops_when_provider_has_no_more_items() {
        let transport = MockTransport::new()
            .with_body(ENDPOINT, google_page(0, 10))
            .with_body(ENDPOINT, r#"{"kind": "customsearch#search"}"#);

        let outcome = searcher(&transport)
            .search_detailed("q", 30, TimeWindow::Any)
            .await;

        assert_eq!(outcome.results.len(), 10);
        assert_eq!(outcome.requests, 2);
        assert_eq!(outcome.stop, SearchStop::Exhausted);
    }

    #[tokio::test]
    async fn test_error_returns_partial_results() {
        let transport = MockTransport::new()
            .with_body(ENDPOINT, google_page(0, 10))
            .with_status(ENDPOINT, 429);

        let outcome = searcher(&transport)
            .search_detailed("q", 25, TimeWindow::Any)
            .await;

        assert_eq!(outcome.results.len(), 10);
        assert_eq!(outcome.requests, 2);
        assert!(outcome.failed());
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty() {
        let transport = MockTransport::new().with_timeout(ENDPOINT);

        let results = searcher(&transport).search("q", 10, TimeWindow::Any).await;

        assert!(results.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_failure() {
        let transport = MockTransport::new().with_body(ENDPOINT, "<html>not json</html>");

        let outcome = searcher(&transport)
            .search_detailed("q", 10, TimeWindow::Any)
            .await;

        assert!(outcome.results.is_empty());
        assert!(outcome.failed());
    }

    #[tokio::test]
    async fn test_items_without_link_are_filtered() {
        let body = r#"{
            "items": [
                {"title": "Has link", "link": "https://a.example/", "snippet": "a"},
                {"title": "No link", "snippet": "b"},
                {"title": "Blank link", "link": "  ", "snippet": "c"},
                {"link": "https://d.example/"}
            ]
        }"#;
        let transport = MockTransport::new()
            .with_body(ENDPOINT, body)
            .with_body(ENDPOINT, "{}");

        let results = searcher(&transport).search("q", 4, TimeWindow::Any).await;

        assert_eq!(results.len(), 2);
        assert_eq!(transport.call_count(), 2);
        assert!(results.iter().all(|r| !r.url.is_empty()));
        assert_eq!(results[0].title, "Has link");
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].url, "https://d.example/");
    }

    #[tokio::test]
    async fn test_next_page_makes_up_for_linkless_items() {
        let first = r#"{
            "items": [
                {"title": "Kept", "link": "https://a.example/"},
                {"title": "No link"},
                {"title": "Also no link"}
            ]
        }"#;
        let transport = MockTransport::new()
            .with_body(ENDPOINT, first)
            .with_body(ENDPOINT, google_page(3, 3));

        let outcome = searcher(&transport)
            .search_detailed("q", 3, TimeWindow::Any)
            .await;

        let urls: Vec<_> = outcome.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example/",
                "https://result.example/3",
                "https://result.example/4"
            ]
        );
        assert_eq!(outcome.requests, 2);
        assert_eq!(outcome.stop, SearchStop::Filled);
        assert_eq!(transport.requests()[1].query_param("start"), Some("4"));
    }

    #[tokio::test]
    async fn test_zero_results_makes_no_request() {
        let transport = MockTransport::new().with_body(ENDPOINT, google_page(0, 10));

        let results = searcher(&transport).search("q", 0, TimeWindow::Any).await;

        assert!(results.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_max_results_is_capped_at_provider_limit() {
        let mut transport = MockTransport::new();
        for page in 0..10 {
            transport = transport.with_body(ENDPOINT, google_page(page * 10, 10));
        }

        let outcome = searcher(&transport)
            .search_detailed("q", 250, TimeWindow::Any)
            .await;

        assert_eq!(outcome.results.len(), MAX_RESULTS);
        assert_eq!(outcome.requests, 10);
    }
}
