//! Built-in extraction strategies.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::html::{extract_structured, scrape_paragraphs};
use crate::error::FetchResult;
use crate::traits::strategy::ContentStrategy;
use crate::traits::transport::{HttpRequest, HttpTransport};

/// Bound on the structured strategy's fetch.
pub const STRUCTURED_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on the fallback strategy's fetch.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-like User-Agent to avoid bot detection.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main-content extraction over a single fetch.
pub struct StructuredStrategy {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl StructuredStrategy {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            timeout: STRUCTURED_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ContentStrategy for StructuredStrategy {
    async fn extract(&self, url: &str) -> FetchResult<String> {
        let request = HttpRequest::get(url).with_timeout(self.timeout);
        let response = self.transport.get(&request).await?.error_for_status()?;
        let text = extract_structured(&response.body);
        debug!(url = %url, chars = text.len(), "Structured extraction finished");
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "structured"
    }
}

/// Tag scraping with a browser User-Agent: `<p>` and `<article>` text.
pub struct FallbackStrategy {
    transport: Arc<dyn HttpTransport>,
    user_agent: String,
    timeout: Duration,
}

impl FallbackStrategy {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: FALLBACK_TIMEOUT,
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ContentStrategy for FallbackStrategy {
    async fn extract(&self, url: &str) -> FetchResult<String> {
        let request = HttpRequest::get(url)
            .with_header("User-Agent", &self.user_agent)
            .with_header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .with_timeout(self.timeout);
        let response = self.transport.get(&request).await?.error_for_status()?;
        let text = scrape_paragraphs(&response.body);
        debug!(url = %url, chars = text.len(), "Paragraph scrape finished");
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_structured_fetch_uses_bounded_timeout() {
        let transport = MockTransport::new()
            .with_html("https://a.example/", "<html><body><p>Hi</p></body></html>");
        let strategy = StructuredStrategy::new(Arc::new(transport.clone()));

        let text = strategy.extract("https://a.example/").await.unwrap();

        assert_eq!(text, "Hi");
        assert_eq!(transport.requests()[0].timeout, Some(STRUCTURED_TIMEOUT));
    }

    #[tokio::test]
    async fn test_fallback_sends_browser_agent_and_timeout() {
        let transport = MockTransport::new()
            .with_html("https://a.example/", "<html><body><p>Hi</p></body></html>");
        let strategy = FallbackStrategy::new(Arc::new(transport.clone()));

        strategy.extract("https://a.example/").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.header("User-Agent"), Some(BROWSER_USER_AGENT));
        assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let transport = MockTransport::new().with_status("https://a.example/gone", 410);

        let structured = StructuredStrategy::new(Arc::new(transport.clone()));
        let fallback = FallbackStrategy::new(Arc::new(transport.clone()));

        assert!(matches!(
            structured.extract("https://a.example/gone").await,
            Err(FetchError::Status { status: 410, .. })
        ));
        assert!(matches!(
            fallback.extract("https://a.example/gone").await,
            Err(FetchError::Status { status: 410, .. })
        ));
    }
}
