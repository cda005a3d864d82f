//! Testing utilities including mock implementations.
//!
//! These let applications exercise the research pipeline without making
//! network or model calls. Every mock records what it was asked, so tests
//! can assert on call counts and request shapes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, ResearchError, Result};
use crate::traits::generator::ReportGenerator;
use crate::traits::transport::{HttpRequest, HttpResponse, HttpTransport};

/// A canned reply for one URL.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with a status and body.
    Response { status: u16, body: String },

    /// Fail as if the request timed out.
    Timeout,

    /// Fail as if the connection was refused.
    Refused,
}

/// A mock HTTP transport for testing.
///
/// Replies are keyed by URL (without query string). Several replies for the
/// same URL are served in order; the last one is repeated once the queue is
/// down to it. Requests to unknown URLs fail with a connection error.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Queued replies by URL
    replies: Arc<RwLock<HashMap<String, VecDeque<MockReply>>>>,

    /// Every request seen, in order
    requests: Arc<RwLock<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Create a mock transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for a URL.
    pub fn with_reply(self, url: impl Into<String>, reply: MockReply) -> Self {
        self.replies
            .write()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a 200 response with the given body.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_reply(
            url,
            MockReply::Response {
                status: 200,
                body: body.into(),
            },
        )
    }

    /// Queue a 200 HTML page.
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_body(url, html)
    }

    /// Queue an empty response with the given status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_reply(
            url,
            MockReply::Response {
                status,
                body: String::new(),
            },
        )
    }

    /// Queue a timeout.
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.with_reply(url, MockReply::Timeout)
    }

    /// Get all requests made to this mock.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Get the requests made to one URL.
    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Number of requests made.
    pub fn call_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }

    fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut replies = self.replies.write().unwrap();
        let queue = replies.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: &HttpRequest) -> FetchResult<HttpResponse> {
        self.requests.write().unwrap().push(request.clone());

        match self.next_reply(&request.url) {
            Some(MockReply::Response { status, body }) => {
                Ok(HttpResponse::new(status, &request.url, body))
            }
            Some(MockReply::Timeout) => Err(FetchError::Timeout {
                url: request.url.clone(),
            }),
            Some(MockReply::Refused) | None => Err(FetchError::Http(Box::new(
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "Mock connection refused",
                ),
            ))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Build a Custom Search JSON page with `count` items numbered from `offset`.
///
/// Item `i` links to `https://result.example/{i}`.
pub fn google_page(offset: usize, count: usize) -> String {
    let items: Vec<_> = (offset..offset + count)
        .map(|i| {
            serde_json::json!({
                "title": format!("Result {}", i),
                "link": format!("https://result.example/{}", i),
                "snippet": format!("Snippet for result {}", i),
            })
        })
        .collect();

    serde_json::json!({
        "kind": "customsearch#search",
        "items": items,
    })
    .to_string()
}

/// Record of a call made to the mock generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockGeneratorCall {
    pub query: String,
    pub sources: Vec<String>,
    pub template: String,
}

/// A mock report generator for testing.
///
/// Returns a fixed report (or a configured failure) and records every call.
#[derive(Clone)]
pub struct MockGenerator {
    report: String,
    fail_with: Option<String>,
    calls: Arc<RwLock<Vec<MockGeneratorCall>>>,
}

impl MockGenerator {
    /// Create a mock generator that answers with a short Markdown report.
    pub fn new() -> Self {
        Self {
            report: "# Executive Summary\n\nMock report.".to_string(),
            fail_with: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the report text returned on success.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = report.into();
        self
    }

    /// Make every call fail with a generation error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockGeneratorCall> {
        self.calls.read().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportGenerator for MockGenerator {
    async fn generate_report(
        &self,
        query: &str,
        sources: &[String],
        template: &str,
    ) -> Result<String> {
        self.calls.write().unwrap().push(MockGeneratorCall {
            query: query.to_string(),
            sources: sources.to_vec(),
            template: template.to_string(),
        });

        match &self.fail_with {
            Some(message) => Err(ResearchError::Generation(message.clone().into())),
            None => Ok(self.report.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_serves_replies_in_order() {
        let transport = MockTransport::new()
            .with_status("https://a.example/", 500)
            .with_body("https://a.example/", "ok");

        let request = HttpRequest::get("https://a.example/");
        assert_eq!(transport.get(&request).await.unwrap().status, 500);
        assert_eq!(transport.get(&request).await.unwrap().body, "ok");
        // Last reply repeats
        assert_eq!(transport.get(&request).await.unwrap().body, "ok");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_url_fails() {
        let transport = MockTransport::new();

        let result = transport.get(&HttpRequest::get("https://nowhere.example/")).await;

        assert!(matches!(result, Err(FetchError::Http(_))));
        assert_eq!(transport.requests_to("https://nowhere.example/").len(), 1);
    }

    #[test]
    fn test_google_page_shape() {
        let page: serde_json::Value = serde_json::from_str(&google_page(10, 2)).unwrap();
        let items = page["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["link"], "https://result.example/10");
        assert_eq!(items[1]["title"], "Result 11");
    }

    #[tokio::test]
    async fn test_mock_generator_records_calls() {
        let generator = MockGenerator::new().with_report("Report body");

        let report = generator
            .generate_report("topic", &["text".to_string()], "template")
            .await
            .unwrap();

        assert_eq!(report, "Report body");
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query, "topic");
        assert_eq!(calls[0].sources, vec!["text".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_generator_failure() {
        let generator = MockGenerator::new().failing("quota exceeded");

        let result = generator.generate_report("topic", &[], "template").await;

        assert!(matches!(result, Err(ResearchError::Generation(_))));
    }
}
