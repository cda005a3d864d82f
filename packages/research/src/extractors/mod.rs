//! Page fetching and text extraction.
//!
//! `ContentExtractor` validates a URL, then tries its strategies in order
//! until one returns non-empty text:
//!
//! 1. `StructuredStrategy` - main-content detection
//! 2. `FallbackStrategy` - `<p>`/`<article>` scraping with a browser UA
//!
//! Extraction is best-effort. Nothing is raised to the caller; the
//! returned `ExtractedContent` carries an outcome tag instead, and every
//! failure is logged.
//!
//! # Example
//!
//! ```rust,ignore
//! let extractor = ContentExtractor::new(Arc::new(ReqwestTransport::new()?));
//! let content = extractor.extract_content("https://example.com/article").await;
//! if !content.succeeded() {
//!     println!("{:?}", content.outcome);
//! }
//! ```

pub mod html;
mod strategies;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::security::UrlValidator;
use crate::traits::strategy::ContentStrategy;
use crate::traits::transport::HttpTransport;
use crate::types::content::ExtractedContent;

pub use strategies::{
    FallbackStrategy, StructuredStrategy, BROWSER_USER_AGENT, FALLBACK_TIMEOUT,
    STRUCTURED_TIMEOUT,
};

/// Ordered chain of extraction strategies behind a URL check.
pub struct ContentExtractor {
    validator: UrlValidator,
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl ContentExtractor {
    /// Structured extraction first, paragraph scraping second.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let strategies: Vec<Box<dyn ContentStrategy>> = vec![
            Box::new(StructuredStrategy::new(Arc::clone(&transport))),
            Box::new(FallbackStrategy::new(transport)),
        ];
        Self::with_strategies(strategies)
    }

    /// Use a custom strategy list, tried in order.
    pub fn with_strategies(strategies: Vec<Box<dyn ContentStrategy>>) -> Self {
        Self {
            validator: UrlValidator::new(),
            strategies,
        }
    }

    /// Replace the URL validator (e.g. one that blocks private networks).
    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extract text from a URL, reporting how it went.
    pub async fn extract_content(&self, url: &str) -> ExtractedContent {
        if let Err(e) = self.validator.validate(url) {
            warn!(url = %url, error = %e, "Rejected URL before fetching");
            return ExtractedContent::rejected(url, e.to_string());
        }

        let mut fetched = false;
        let mut last_error = None;

        for strategy in &self.strategies {
            match strategy.extract(url).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(url = %url, strategy = strategy.name(), chars = text.len(), "Extracted content");
                    return ExtractedContent::extracted(url, text.trim(), strategy.name());
                }
                Ok(_) => {
                    debug!(url = %url, strategy = strategy.name(), "Strategy found no content");
                    fetched = true;
                }
                Err(e) => {
                    warn!(url = %url, strategy = strategy.name(), error = %e, "Strategy failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        if fetched {
            info!(url = %url, "Page fetched but no extractable content");
            ExtractedContent::no_content(url)
        } else {
            let reason = last_error.unwrap_or_else(|| "no extraction strategies".to_string());
            warn!(url = %url, reason = %reason, "Extraction failed");
            ExtractedContent::failed(url, reason)
        }
    }

    /// Extract text from a URL; empty on invalid input, failure or no content.
    pub async fn extract(&self, url: &str) -> String {
        self.extract_content(url).await.text
    }
}
