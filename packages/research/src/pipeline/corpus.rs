//! Corpus aggregation.
//!
//! A corpus holds one entry per selected URL, in selection order. Failed
//! and empty sources are kept as empty entries so that "Source N" in the
//! generated report always points at the N-th selected URL.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::normalize::normalize;
use super::prompts::format_sources;
use crate::extractors::ContentExtractor;
use crate::types::content::ExtractionOutcome;

/// Normalized text for one selected source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// 0-based position in the selection.
    pub index: usize,

    pub url: String,

    /// Normalized text; empty when extraction produced nothing.
    pub text: String,

    pub outcome: ExtractionOutcome,
}

impl CorpusEntry {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Extracted { .. })
    }
}

/// Ordered per-source texts for one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub entries: Vec<CorpusEntry>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(index, text)` pairs in selection order.
    pub fn pairs(&self) -> Vec<(usize, String)> {
        self.entries
            .iter()
            .map(|e| (e.index, e.text.clone()))
            .collect()
    }

    /// Texts in selection order, as handed to the report generator.
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    /// Number of sources that yielded text.
    pub fn succeeded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.succeeded()).count()
    }

    /// Render with `Source N:` headers (1-based).
    pub fn render(&self) -> String {
        format_sources(&self.texts())
    }
}

/// Extract and normalize every selected URL, strictly in order.
///
/// Duplicates are fetched again and failures become empty entries, so the
/// corpus always has exactly one entry per input URL.
pub async fn build_corpus(extractor: &ContentExtractor, urls: &[String]) -> Corpus {
    let mut entries = Vec::with_capacity(urls.len());

    for (index, url) in urls.iter().enumerate() {
        let content = extractor.extract_content(url).await.map_text(normalize);
        debug!(index, url = %url, chars = content.text.len(), "Corpus entry built");
        entries.push(CorpusEntry {
            index,
            url: content.url,
            text: content.text,
            outcome: content.outcome,
        });
    }

    let corpus = Corpus { entries };
    info!(
        sources = corpus.len(),
        succeeded = corpus.succeeded_count(),
        "Built corpus"
    );
    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use std::sync::Arc;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_keep_their_position() {
        let transport = MockTransport::new()
            .with_html("https://a.example/ok", "<html><body><p>Hello world</p></body></html>")
            .with_timeout("https://b.example/dead");
        let extractor = ContentExtractor::new(Arc::new(transport));

        let corpus = build_corpus(
            &extractor,
            &urls(&["https://a.example/ok", "https://b.example/dead"]),
        )
        .await;

        assert_eq!(
            corpus.pairs(),
            vec![(0, "Hello world".to_string()), (1, String::new())]
        );
        assert_eq!(corpus.succeeded_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_are_fetched_again() {
        let transport = MockTransport::new()
            .with_html("https://a.example/", "<html><body><p>Same</p></body></html>");
        let extractor = ContentExtractor::new(Arc::new(transport.clone()));

        let corpus = build_corpus(
            &extractor,
            &urls(&["https://a.example/", "not a url", "https://a.example/"]),
        )
        .await;

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.texts(), vec!["Same", "", "Same"]);
        assert_eq!(transport.requests_to("https://a.example/").len(), 2);
    }

    #[tokio::test]
    async fn test_text_is_normalized() {
        let transport = MockTransport::new().with_html(
            "https://a.example/",
            "<html><body><h1>Title</h1><p>Line   one</p></body></html>",
        );
        let extractor = ContentExtractor::new(Arc::new(transport));

        let corpus = build_corpus(&extractor, &urls(&["https://a.example/"])).await;

        assert_eq!(corpus.entries[0].text, "Title Line one");
    }

    #[tokio::test]
    async fn test_render_uses_one_based_headers() {
        let corpus = Corpus {
            entries: vec![
                CorpusEntry {
                    index: 0,
                    url: "https://a.example/".to_string(),
                    text: "A".to_string(),
                    outcome: ExtractionOutcome::Extracted {
                        strategy: "structured".to_string(),
                    },
                },
                CorpusEntry {
                    index: 1,
                    url: "https://b.example/".to_string(),
                    text: String::new(),
                    outcome: ExtractionOutcome::NoContent,
                },
            ],
        };

        assert_eq!(corpus.render(), "Source 1:\nA\n\nSource 2:\n");
    }

    #[tokio::test]
    async fn test_empty_selection() {
        let extractor = ContentExtractor::new(Arc::new(MockTransport::new()));
        let corpus = build_corpus(&extractor, &[]).await;
        assert!(corpus.is_empty());
    }
}
