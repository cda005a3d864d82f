//! Knowledge base commands

use anyhow::{Context, Result};
use clap::Args;

use research::{ExportFormat, ReportStore, ResearchError};

use crate::context::AppContext;
use crate::output::{print_report, report_line};

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Maximum number of reports to list
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Only reports whose topic contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

/// List stored reports, newest first.
pub async fn list(ctx: &AppContext, args: HistoryArgs) -> Result<()> {
    let store = ctx.store().await?;
    let reports = match args.search.as_deref().map(str::trim) {
        Some(needle) if !needle.is_empty() => store.search(needle).await?,
        _ => store.list(args.limit).await?,
    };

    if reports.is_empty() {
        ctx.print_warning("No reports found.");
        return Ok(());
    }

    ctx.print_header("Knowledge Base");
    for report in &reports {
        println!("{}", report_line(report));
        for url in &report.sources {
            println!("    - {}", url);
        }
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: i64) -> Result<()> {
    let store = ctx.store().await?;
    let report = store.get(id).await?.ok_or(ResearchError::NotFound { id })?;
    print_report(&report);
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: i64, yes: bool) -> Result<()> {
    let store = ctx.store().await?;
    let report = store.get(id).await?.ok_or(ResearchError::NotFound { id })?;

    if !yes && !ctx.confirm(&format!("Delete report {} ({})?", id, report.query), false)? {
        ctx.print_info("Cancelled.");
        return Ok(());
    }

    if store.delete(id).await? {
        ctx.print_success("Report deleted successfully!");
    } else {
        ctx.print_warning(&format!("Report {} was already gone.", id));
    }
    Ok(())
}

pub async fn export(ctx: &AppContext, id: i64, format: ExportFormat) -> Result<()> {
    let store = ctx.store().await?;
    let report = store.get(id).await?.ok_or(ResearchError::NotFound { id })?;

    let path = ctx
        .exporter()
        .export(&report.query, &report.content, format)
        .with_context(|| format!("Failed to export report {}", id))?;
    ctx.print_success(&format!("Exported to {}", path.display()));
    println!("{}", path.display());
    Ok(())
}
