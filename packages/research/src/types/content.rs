//! Extracted page content and how it was obtained.

use serde::{Deserialize, Serialize};

/// How an extraction attempt ended.
///
/// Every variant other than `Extracted` leaves the text empty; they differ
/// only in what went wrong, so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// A strategy produced text.
    Extracted { strategy: String },

    /// The page was fetched but held no extractable prose.
    NoContent,

    /// Every strategy failed to fetch or parse the page.
    Failed { reason: String },

    /// The URL was refused before any request was made.
    Rejected { reason: String },
}

/// Text extracted from one selected source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Source URL as selected.
    pub url: String,

    /// Extracted text; empty unless `outcome` is `Extracted`.
    pub text: String,

    /// How the extraction ended.
    pub outcome: ExtractionOutcome,
}

impl ExtractedContent {
    pub fn extracted(url: impl Into<String>, text: impl Into<String>, strategy: &str) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            outcome: ExtractionOutcome::Extracted {
                strategy: strategy.to_string(),
            },
        }
    }

    pub fn no_content(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: String::new(),
            outcome: ExtractionOutcome::NoContent,
        }
    }

    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: String::new(),
            outcome: ExtractionOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn rejected(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: String::new(),
            outcome: ExtractionOutcome::Rejected {
                reason: reason.into(),
            },
        }
    }

    /// True only when text was extracted.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Extracted { .. })
    }

    /// Replace the text, keeping the outcome (used after normalization).
    pub fn map_text(mut self, f: impl FnOnce(&str) -> String) -> Self {
        self.text = f(&self.text);
        self
    }
}
