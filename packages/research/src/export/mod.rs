//! Report export to PDF, DOCX and plain text.
//!
//! Every format carries the same three parts: a "Research Report" title, a
//! "Topic: {query}" heading, and the report body.

mod pdf;

use chrono::{DateTime, Local};
use docx_rs::{Docx, Paragraph, Run};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::{ResearchError, Result};

/// Default export directory.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Title written at the top of every export.
pub const REPORT_TITLE: &str = "Research Report";

const SAFE_QUERY_CHARS: usize = 30;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Txt,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Pdf, Self::Docx, Self::Txt]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(format!("unknown export format: {} (expected pdf, docx or txt)", other)),
        }
    }
}

/// Writes reports into an export directory.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    export_dir: PathBuf,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_DIR)
    }
}

impl ReportExporter {
    /// Create an exporter writing into `export_dir` (created on first export).
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Export a report, returning the path of the written file.
    pub fn export(&self, query: &str, content: &str, format: ExportFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.export_dir)?;
        let path = self
            .export_dir
            .join(export_filename(query, format, Local::now()));

        match format {
            ExportFormat::Txt => write_txt(&path, query, content)?,
            ExportFormat::Docx => write_docx(&path, query, content)?,
            ExportFormat::Pdf => pdf::write_pdf(&path, query, content)?,
        }

        info!(path = %path.display(), format = %format, "Exported report");
        Ok(path)
    }
}

/// `{safe_query}_{YYYYmmdd_HHMMSS}.{ext}`.
///
/// `safe_query` is the query with every non-alphanumeric character replaced
/// by `_`, cut to 30 characters.
pub fn export_filename(query: &str, format: ExportFormat, at: DateTime<Local>) -> String {
    let safe_query: String = query
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(SAFE_QUERY_CHARS)
        .collect();

    format!(
        "{}_{}.{}",
        safe_query,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn write_txt(path: &Path, query: &str, content: &str) -> Result<()> {
    let text = format!("{}\n\nTopic: {}\n\n{}", REPORT_TITLE, query, content);
    std::fs::write(path, text)?;
    Ok(())
}

fn write_docx(path: &Path, query: &str, content: &str) -> Result<()> {
    // Sizes are in half-points
    let mut docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(REPORT_TITLE).size(40).bold()))
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(format!("Topic: {}", query)).size(28).bold()),
        );

    for line in content.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = std::fs::File::create(path)?;
    docx.build()
        .pack(file)
        .map_err(|e| ResearchError::Export(e.to_string().into()))?;
    Ok(())
}
