//! Report generator trait.

use async_trait::async_trait;

use crate::error::Result;

/// Turns a query and its source texts into a Markdown report.
///
/// `sources` is positional: entry `i` is rendered as `Source {i+1}`, and
/// empty entries stand for sources that yielded nothing.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Generate a report. An empty model response is an error.
    async fn generate_report(
        &self,
        query: &str,
        sources: &[String],
        template: &str,
    ) -> Result<String>;

    /// Get the generator name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
