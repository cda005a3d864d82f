//! Request-scoped research state and the orchestrator that drives it.
//!
//! A `ResearchSession` belongs to the caller. It carries the query, the
//! search results, the chosen sources and the latest report between the
//! interactive steps, so nothing leaks from one research request into
//! another.
//!
//! # Example
//!
//! ```rust,ignore
//! let researcher = Researcher::new(searcher, extractor, generator);
//! let mut session = ResearchSession::new("heat pumps in cold climates");
//!
//! researcher.search(&mut session).await;
//! session.select(0);
//! session.select(2);
//! let report = researcher.generate(&mut session, DEFAULT_PROMPT_TEMPLATE).await?;
//! ```

use tracing::{info, warn};

use super::corpus::{build_corpus, Corpus};
use crate::error::{ResearchError, Result};
use crate::extractors::ContentExtractor;
use crate::traits::generator::ReportGenerator;
use crate::traits::searcher::{SearchResult, SearchStop, TimeWindow, WebSearcher};
use crate::types::report::NewReport;

/// Result count used when the caller does not choose one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Ordered set of selected source URLs.
///
/// A URL appears at most once; order is selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSelection {
    urls: Vec<String>,
}

impl SourceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a URL. Returns false if it was already selected.
    pub fn add(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.contains(&url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    /// Remove a URL. Returns false if it was not selected.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.urls.len();
        self.urls.retain(|u| u != url);
        self.urls.len() < before
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for SourceSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for url in iter {
            selection.add(url);
        }
        selection
    }
}

/// State of one research request.
#[derive(Debug, Clone)]
pub struct ResearchSession {
    pub query: String,
    pub max_results: usize,
    pub time_window: TimeWindow,

    /// Results of the latest search.
    pub results: Vec<SearchResult>,

    /// How the latest search ended; `None` before the first search.
    pub search_stop: Option<SearchStop>,

    pub selection: SourceSelection,

    /// Corpus behind the latest report.
    pub corpus: Option<Corpus>,

    /// Latest generated report (Markdown).
    pub report: Option<String>,
}

impl ResearchSession {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
            time_window: TimeWindow::Any,
            results: Vec::new(),
            search_stop: None,
            selection: SourceSelection::new(),
            corpus: None,
            report: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    /// Select the search result at `index`.
    ///
    /// Returns false when the index is out of range or already selected.
    pub fn select(&mut self, index: usize) -> bool {
        match self.results.get(index) {
            Some(result) => self.selection.add(result.url.clone()),
            None => false,
        }
    }

    /// Whether the latest search ended on an error.
    pub fn search_failed(&self) -> bool {
        matches!(self.search_stop, Some(SearchStop::Failed(_)))
    }

    /// The generated report, ready to be persisted.
    pub fn to_new_report(&self) -> Option<NewReport> {
        self.report.as_ref().map(|content| {
            NewReport::new(
                self.query.clone(),
                content.clone(),
                self.selection.urls().to_vec(),
            )
        })
    }
}

/// Runs the search, aggregation and generation steps for a session.
pub struct Researcher<W: WebSearcher, G: ReportGenerator> {
    searcher: W,
    extractor: ContentExtractor,
    generator: G,
}

impl<W: WebSearcher, G: ReportGenerator> Researcher<W, G> {
    pub fn new(searcher: W, extractor: ContentExtractor, generator: G) -> Self {
        Self {
            searcher,
            extractor,
            generator,
        }
    }

    pub fn searcher(&self) -> &W {
        &self.searcher
    }

    pub fn extractor(&self) -> &ContentExtractor {
        &self.extractor
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run the session's search. Replaces earlier results and clears the
    /// selection, corpus and report. Returns the number of results.
    pub async fn search(&self, session: &mut ResearchSession) -> usize {
        let outcome = self
            .searcher
            .search_detailed(&session.query, session.max_results, session.time_window)
            .await;

        match &outcome.stop {
            SearchStop::Failed(reason) => warn!(
                query = %session.query,
                results = outcome.results.len(),
                reason = %reason,
                "Search ended early"
            ),
            stop => info!(
                query = %session.query,
                results = outcome.results.len(),
                requests = outcome.requests,
                stop = ?stop,
                "Search finished"
            ),
        }

        session.results = outcome.results;
        session.search_stop = Some(outcome.stop);
        session.selection.clear();
        session.corpus = None;
        session.report = None;
        session.results.len()
    }

    /// Build a fresh corpus from the session's selection.
    pub async fn build_corpus(&self, session: &ResearchSession) -> Corpus {
        build_corpus(&self.extractor, session.selection.urls()).await
    }

    /// Build a fresh corpus and generate a report from it.
    ///
    /// The corpus is rebuilt on every call; nothing is cached between
    /// generations.
    pub async fn generate(&self, session: &mut ResearchSession, template: &str) -> Result<String> {
        if session.selection.is_empty() {
            return Err(ResearchError::NoSourcesSelected);
        }

        let corpus = self.build_corpus(session).await;
        if corpus.succeeded_count() == 0 {
            warn!(query = %session.query, sources = corpus.len(), "No source yielded any text");
        }

        let report = self
            .generator
            .generate_report(&session.query, &corpus.texts(), template)
            .await?;

        info!(
            query = %session.query,
            generator = self.generator.name(),
            chars = report.len(),
            "Report generated"
        );
        session.corpus = Some(corpus);
        session.report = Some(report.clone());
        Ok(report)
    }
}
