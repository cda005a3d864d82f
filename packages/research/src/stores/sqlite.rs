//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - The local knowledge base
//! - Testing with persistent data
//!
//! Source URLs are stored as a JSON array and decoded with `serde_json`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{ResearchError, Result};
use crate::traits::store::ReportStore;
use crate::types::report::{NewReport, Report};

/// SQLite-based report store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://knowledge_base.db` - File-based database
    /// - `sqlite://knowledge_base.db?mode=rwc` - Create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Uses a single connection, since every connection to `:memory:` opens
    /// its own database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                content TEXT NOT NULL,
                sources TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reports_created_at ON reports(created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        Ok(())
    }
}

// Row types for sqlx queries
#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    query: String,
    content: String,
    sources: String,
    created_at: String,
}

impl ReportRow {
    fn into_report(self) -> Result<Report> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| ResearchError::Storage(format!("Invalid date: {}", e).into()))?
            .with_timezone(&Utc);

        let sources: Vec<String> = serde_json::from_str(&self.sources)
            .map_err(|e| ResearchError::Storage(format!("Invalid sources JSON: {}", e).into()))?;

        Ok(Report {
            id: self.id,
            query: self.query,
            content: self.content,
            sources,
            created_at,
        })
    }
}

fn into_reports(rows: Vec<ReportRow>) -> Result<Vec<Report>> {
    rows.into_iter().map(ReportRow::into_report).collect()
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn save(&self, report: &NewReport) -> Result<Report> {
        // Stored with microsecond precision
        let created_at = Utc::now().trunc_subsecs(6);
        let sources = serde_json::to_string(&report.sources)?;

        let result = sqlx::query(
            "INSERT INTO reports (query, content, sources, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&report.query)
        .bind(&report.content)
        .bind(&sources)
        // Fixed-width timestamps keep text ordering chronological
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await
        .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        Ok(report
            .clone()
            .into_report(result.last_insert_rowid(), created_at))
    }

    async fn list(&self, limit: usize) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT * FROM reports ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        into_reports(rows)
    }

    async fn search(&self, needle: &str) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT * FROM reports WHERE instr(lower(query), lower(?)) > 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(needle)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        into_reports(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Report>> {
        let row = sqlx::query_as::<_, ReportRow>("SELECT * FROM reports WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        row.map(ReportRow::into_report).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ResearchError::Storage(e.to_string().into()))?;

        Ok(result.rows_affected() > 0)
    }
}
