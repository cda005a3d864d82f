//! Content extraction strategy trait.
//!
//! A strategy fetches one page its own way and returns the prose it found.
//! `ContentExtractor` keeps an ordered list of strategies and stops at the
//! first one that returns non-empty text.

use async_trait::async_trait;

use crate::error::FetchResult;

/// One way of turning a URL into readable text.
///
/// `Ok("")` means the page was fetched but nothing readable was found;
/// `Err` means the page could not be fetched or parsed at all.
#[async_trait]
pub trait ContentStrategy: Send + Sync {
    /// Extract readable text from a validated URL.
    async fn extract(&self, url: &str) -> FetchResult<String>;

    /// Strategy name, recorded in `ExtractionOutcome::Extracted`.
    fn name(&self) -> &str;
}
