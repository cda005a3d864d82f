//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::ReportStore;
use crate::types::report::{query_matches, NewReport, Report};

/// In-memory report store.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    reports: RwLock<Vec<Report>>,
    next_id: RwLock<i64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.reports.write().unwrap().clear();
    }

    /// Get the number of stored reports.
    pub fn report_count(&self) -> usize {
        self.reports.read().unwrap().len()
    }

    fn newest_first(mut reports: Vec<Report>) -> Vec<Report> {
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reports
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save(&self, report: &NewReport) -> Result<Report> {
        let id = {
            let mut next_id = self.next_id.write().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let saved = report.clone().into_report(id, Utc::now());
        self.reports.write().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn list(&self, limit: usize) -> Result<Vec<Report>> {
        let reports = self.reports.read().unwrap().clone();
        Ok(Self::newest_first(reports).into_iter().take(limit).collect())
    }

    async fn search(&self, needle: &str) -> Result<Vec<Report>> {
        let reports: Vec<_> = self
            .reports
            .read()
            .unwrap()
            .iter()
            .filter(|r| query_matches(&r.query, needle))
            .cloned()
            .collect();
        Ok(Self::newest_first(reports))
    }

    async fn get(&self, id: i64) -> Result<Option<Report>> {
        Ok(self
            .reports
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut reports = self.reports.write().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }
}
