//! Report storage trait.
//!
//! The knowledge base keeps generated reports with the source URLs they
//! were built from. Listings are always newest first.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::report::{NewReport, Report};

/// Persistence for generated reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Save a report, returning it with its assigned id and timestamp.
    async fn save(&self, report: &NewReport) -> Result<Report>;

    /// Most recent reports, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<Report>>;

    /// Reports whose query contains `needle` (case-insensitive), newest first.
    ///
    /// Case folding is backend-specific: `MemoryStore` folds full Unicode,
    /// while `SqliteStore` relies on SQLite's `lower()`, which only folds
    /// ASCII. "ÉTÉ" finds "été" in memory but not in SQLite.
    async fn search(&self, needle: &str) -> Result<Vec<Report>>;

    /// Get a report by id.
    async fn get(&self, id: i64) -> Result<Option<Report>>;

    /// Delete a report. Returns false when no such report exists.
    async fn delete(&self, id: i64) -> Result<bool>;
}
