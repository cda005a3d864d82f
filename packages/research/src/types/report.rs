//! Stored research reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest query kept with a report, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// A generated report as persisted in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,

    /// Research topic the report was generated for.
    pub query: String,

    /// Markdown report body.
    pub content: String,

    /// Selected source URLs, in selection order.
    pub sources: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Short label for listings: `query - YYYY-mm-dd HH:MM`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.query, self.created_at.format("%Y-%m-%d %H:%M"))
    }
}

/// A report about to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub query: String,
    pub content: String,
    pub sources: Vec<String>,
}

impl NewReport {
    /// Create a new report; the query is cut to [`MAX_QUERY_CHARS`].
    pub fn new(query: impl Into<String>, content: impl Into<String>, sources: Vec<String>) -> Self {
        let query: String = query.into();
        Self {
            query: query.chars().take(MAX_QUERY_CHARS).collect(),
            content: content.into(),
            sources,
        }
    }

    /// Attach an id and timestamp.
    pub fn into_report(self, id: i64, created_at: DateTime<Utc>) -> Report {
        Report {
            id,
            query: self.query,
            content: self.content,
            sources: self.sources,
            created_at,
        }
    }
}

/// Case-insensitive substring match on a report's query.
pub(crate) fn query_matches(query: &str, needle: &str) -> bool {
    query.to_lowercase().contains(&needle.to_lowercase())
}
