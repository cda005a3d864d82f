//! Web searcher trait for source discovery.
//!
//! A search turns a free-text query into an ordered list of candidate
//! sources. The caller (usually a person in the CLI) picks which of them
//! feed the report.
//!
//! Searching never fails from the caller's point of view: transport and
//! API errors end the search early and whatever was collected so far is
//! returned. `search_detailed` exposes why a search stopped for callers
//! that need to tell "no matches" apart from "the provider was down".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// A discovered source from web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title of the page (empty when the provider omitted it).
    pub title: String,

    /// The discovered URL; never empty.
    pub url: String,

    /// Snippet/description from search results.
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Coarse recency filter applied to a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Any,
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    /// Parse a user-facing label. Unrecognized labels mean `Any`.
    ///
    /// Accepts the short names (`day`, `week`, ...) as well as the
    /// "Past 24 hours" / "Past week" style labels.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "day" | "d1" | "24h" | "past 24 hours" | "past day" => Self::Day,
            "week" | "w1" | "past week" => Self::Week,
            "month" | "m1" | "past month" => Self::Month,
            "year" | "y1" | "past year" => Self::Year,
            _ => Self::Any,
        }
    }

    /// The provider's `dateRestrict` token, if any.
    pub fn date_restrict(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Day => Some("d1"),
            Self::Week => Some("w1"),
            Self::Month => Some("m1"),
            Self::Year => Some("y1"),
        }
    }

    pub fn all() -> [Self; 5] {
        [Self::Any, Self::Day, Self::Week, Self::Month, Self::Year]
    }
}

impl From<&str> for TimeWindow {
    fn from(label: &str) -> Self {
        Self::parse_lenient(label)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Any => "Any",
            Self::Day => "Past 24 hours",
            Self::Week => "Past week",
            Self::Month => "Past month",
            Self::Year => "Past year",
        };
        f.write_str(label)
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStop {
    /// `max_results` items were collected.
    Filled,
    /// The provider returned a page without items.
    Exhausted,
    /// A request failed; carries the error message.
    Failed(String),
}

/// Results of a search together with how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Ordered results, at most `max_results` long.
    pub results: Vec<SearchResult>,

    /// Number of provider requests issued.
    pub requests: usize,

    /// Why the pagination loop stopped.
    pub stop: SearchStop,
}

impl SearchOutcome {
    /// True when the search ended because of an error.
    pub fn failed(&self) -> bool {
        matches!(self.stop, SearchStop::Failed(_))
    }
}

/// Web search trait.
///
/// # Implementations
///
/// - `GoogleSearcher` - Google Custom Search JSON API
/// - `MockWebSearcher` - For testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search, reporting how the search ended.
    async fn search_detailed(
        &self,
        query: &str,
        max_results: usize,
        window: TimeWindow,
    ) -> SearchOutcome;

    /// Search for up to `max_results` sources, in provider rank order.
    ///
    /// Partial results are a normal outcome; an empty list means either
    /// no matches or total failure.
    async fn search(&self, query: &str, max_results: usize, window: TimeWindow) -> Vec<SearchResult> {
        self.search_detailed(query, max_results, window).await.results
    }

    /// Get the searcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Mock web searcher for testing.
#[derive(Default)]
pub struct MockWebSearcher {
    results: RwLock<HashMap<String, Vec<SearchResult>>>,
    calls: RwLock<Vec<(String, usize, TimeWindow)>>,
}

impl MockWebSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results for a query.
    pub fn with_results(self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results
            .write()
            .unwrap()
            .insert(query.to_string(), results);
        self
    }

    /// Add URL strings as results, titled after their position.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let results = urls
            .iter()
            .enumerate()
            .map(|(i, u)| SearchResult::new(format!("Result {}", i + 1), *u, ""))
            .collect();
        self.with_results(query, results)
    }

    /// Recorded `(query, max_results, window)` calls.
    pub fn calls(&self) -> Vec<(String, usize, TimeWindow)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search_detailed(
        &self,
        query: &str,
        max_results: usize,
        window: TimeWindow,
    ) -> SearchOutcome {
        self.calls
            .write()
            .unwrap()
            .push((query.to_string(), max_results, window));

        let mut results = self
            .results
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        let stop = if results.len() >= max_results {
            SearchStop::Filled
        } else {
            SearchStop::Exhausted
        };
        results.truncate(max_results);

        SearchOutcome {
            results,
            requests: 1,
            stop,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_tokens() {
        assert_eq!(TimeWindow::Any.date_restrict(), None);
        assert_eq!(TimeWindow::Day.date_restrict(), Some("d1"));
        assert_eq!(TimeWindow::Week.date_restrict(), Some("w1"));
        assert_eq!(TimeWindow::Month.date_restrict(), Some("m1"));
        assert_eq!(TimeWindow::Year.date_restrict(), Some("y1"));
    }

    #[test]
    fn test_time_window_lenient_parse() {
        assert_eq!(TimeWindow::from("Past 24 hours"), TimeWindow::Day);
        assert_eq!(TimeWindow::from("week"), TimeWindow::Week);
        assert_eq!(TimeWindow::from("Past month"), TimeWindow::Month);
        assert_eq!(TimeWindow::from("YEAR"), TimeWindow::Year);
        assert_eq!(TimeWindow::from("fortnight"), TimeWindow::Any);
        assert_eq!(TimeWindow::from(""), TimeWindow::Any);
    }

    #[test]
    fn test_time_window_display_round_trips_through_parse() {
        for window in TimeWindow::all() {
            assert_eq!(TimeWindow::parse_lenient(&window.to_string()), window);
        }
    }

    #[tokio::test]
    async fn test_mock_web_searcher() {
        let searcher = MockWebSearcher::new().with_urls(
            "rust async",
            &["https://tokio.rs/", "https://rust-lang.org/"],
        );

        let results = searcher.search("rust async", 10, TimeWindow::Any).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://tokio.rs/");
        assert_eq!(searcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_truncates_to_max_results() {
        let searcher = MockWebSearcher::new().with_urls(
            "query",
            &["https://a.com", "https://b.com", "https://c.com"],
        );

        let outcome = searcher
            .search_detailed("query", 2, TimeWindow::Week)
            .await;
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.stop, SearchStop::Filled);
        assert_eq!(searcher.calls()[0].2, TimeWindow::Week);
    }
}
