//! Search and report generation commands

use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::{Input, MultiSelect, Select};

use research::{
    ExportFormat, ReportStore, ResearchSession, SearchStop, TimeWindow, DEFAULT_PROMPT_TEMPLATE,
};

use crate::context::AppContext;
use crate::output::{print_markdown, print_results, short_title};

/// Options shared by `run` and `search`.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Research topic
    pub query: String,

    /// Number of search results to fetch
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=100))]
    pub max_results: u64,

    /// Recency filter: any, day, week, month or year
    #[arg(short, long, default_value = "any")]
    pub time_window: String,
}

impl SearchArgs {
    fn session(&self) -> ResearchSession {
        ResearchSession::new(self.query.trim())
            .with_max_results(self.max_results as usize)
            .with_time_window(TimeWindow::parse_lenient(&self.time_window))
    }
}

/// Options for `run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Result numbers to use as sources (1-based, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Use every search result as a source
    #[arg(long, conflicts_with = "select")]
    pub all: bool,

    /// Custom prompt template
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Export the report after generating it
    #[arg(short, long)]
    pub export: Option<ExportFormat>,
}

/// Search, pick sources, generate, save and optionally export a report.
pub async fn run(ctx: &AppContext, args: RunArgs) -> Result<()> {
    let researcher = ctx.researcher()?;
    let store = ctx.store().await?;
    let mut session = args.search.session();

    ctx.print_header(&format!("Researching \"{}\"", session.query));
    ctx.print_info(&format!(
        "Searching ({} results, {})...",
        session.max_results, session.time_window
    ));
    researcher.search(&mut session).await;
    report_search_stop(ctx, &session);
    if session.results.is_empty() {
        bail!("No search results for \"{}\"", session.query);
    }

    for index in choose_sources(ctx, &session, &args)? {
        session.select(index);
    }
    if session.selection.is_empty() {
        ctx.print_warning("No sources selected.");
        return Ok(());
    }

    let template = match args.prompt {
        Some(prompt) => prompt,
        None if ctx.interactive() => Input::with_theme(&ctx.theme())
            .with_prompt("Prompt template")
            .default(DEFAULT_PROMPT_TEMPLATE.to_string())
            .interact_text()?,
        None => DEFAULT_PROMPT_TEMPLATE.to_string(),
    };

    ctx.print_info(&format!(
        "Reading {} sources and generating report...",
        session.selection.len()
    ));
    let report = researcher
        .generate(&mut session, &template)
        .await
        .context("Report generation failed")?;

    if let Some(corpus) = &session.corpus {
        if corpus.succeeded_count() < corpus.len() {
            ctx.print_warning(&format!(
                "{} of {} sources yielded no text.",
                corpus.len() - corpus.succeeded_count(),
                corpus.len()
            ));
        }
    }

    println!();
    print_markdown(&report);
    println!();

    if let Some(new_report) = session.to_new_report() {
        let saved = store.save(&new_report).await?;
        ctx.print_success(&format!("Saved to knowledge base as report {}", saved.id));
    }

    let format = match args.export {
        Some(format) => Some(format),
        None if ctx.interactive() && ctx.confirm("Export report?", false)? => {
            Some(choose_format(ctx)?)
        }
        None => None,
    };
    if let Some(format) = format {
        let path = ctx.exporter().export(&session.query, &report, format)?;
        ctx.print_success(&format!("Exported to {}", path.display()));
    }

    Ok(())
}

/// Print search results only.
pub async fn search(ctx: &AppContext, args: SearchArgs) -> Result<()> {
    let researcher = ctx.researcher()?;
    let mut session = args.session();

    researcher.search(&mut session).await;
    report_search_stop(ctx, &session);
    if session.results.is_empty() {
        ctx.print_warning("No results.");
        return Ok(());
    }

    print_results(&session.results);
    Ok(())
}

fn report_search_stop(ctx: &AppContext, session: &ResearchSession) {
    if let Some(SearchStop::Failed(reason)) = &session.search_stop {
        ctx.print_warning(&format!(
            "Search stopped early after {} results: {}",
            session.results.len(),
            reason
        ));
    }
}

/// 0-based indexes of the chosen results.
fn choose_sources(ctx: &AppContext, session: &ResearchSession, args: &RunArgs) -> Result<Vec<usize>> {
    if args.all {
        return Ok((0..session.results.len()).collect());
    }
    if !args.select.is_empty() {
        return args
            .select
            .iter()
            .map(|&n| match n {
                n if (1..=session.results.len()).contains(&n) => Ok(n - 1),
                n => bail!("No search result number {}", n),
            })
            .collect();
    }
    if !ctx.interactive() {
        bail!("Pass --select or --all to choose sources when not running interactively");
    }

    let items: Vec<String> = session.results.iter().map(short_title).collect();
    Ok(MultiSelect::with_theme(&ctx.theme())
        .with_prompt("Select sources (space to toggle, enter to confirm)")
        .items(&items)
        .interact()?)
}

pub fn choose_format(ctx: &AppContext) -> Result<ExportFormat> {
    let formats = ExportFormat::all();
    let items: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
    let choice = Select::with_theme(&ctx.theme())
        .with_prompt("Export format")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(formats[choice])
}
