//! Research CLI
//!
//! Search the web, pick sources, generate a report and keep it in the
//! local knowledge base.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use research::{ExportFormat, TimeWindow};

mod cmd;
mod context;
mod output;

use cmd::history::HistoryArgs;
use cmd::report::{RunArgs, SearchArgs};
use context::AppContext;

#[derive(Parser)]
#[command(name = "research")]
#[command(about = "Web research and report generation")]
#[command(version)]
struct Cli {
    /// Run in quiet mode (non-interactive)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, select sources and generate a report
    Run(RunArgs),

    /// Print search results without generating anything
    Search(SearchArgs),

    /// List stored reports
    History(HistoryArgs),

    /// Show a stored report
    Show {
        /// Report id
        id: i64,
    },

    /// Delete a stored report
    Delete {
        /// Report id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a stored report
    Export {
        /// Report id
        id: i64,

        /// pdf, docx or txt
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before logging so RUST_LOG can come from it
    let _ = dotenvy::dotenv();

    // Initialize logging (stderr, so reports on stdout stay clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,research=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.quiet)?;

    match cli.command {
        Some(Commands::Run(args)) => cmd::report::run(&ctx, args).await,
        Some(Commands::Search(args)) => cmd::report::search(&ctx, args).await,
        Some(Commands::History(args)) => cmd::history::list(&ctx, args).await,
        Some(Commands::Show { id }) => cmd::history::show(&ctx, id).await,
        Some(Commands::Delete { id, yes }) => cmd::history::delete(&ctx, id, yes).await,
        Some(Commands::Export { id, format }) => cmd::history::export(&ctx, id, format).await,
        None => interactive_menu(&ctx).await,
    }
}

async fn interactive_menu(ctx: &AppContext) -> Result<()> {
    use dialoguer::Select;

    ctx.require_interactive()?;

    let items = vec![
        "Search & generate report",
        "Browse knowledge base",
        "Search knowledge base",
        "Exit",
    ];

    loop {
        println!();
        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => research_prompt(ctx).await,
            1 => {
                cmd::history::list(
                    ctx,
                    HistoryArgs {
                        limit: 10,
                        search: None,
                    },
                )
                .await
            }
            2 => knowledge_base_search(ctx).await,
            _ => break,
        };

        // Keep the menu alive after a failed action
        if let Err(e) = result {
            ctx.print_warning(&format!("Error: {:#}", e));
        }
    }

    Ok(())
}

async fn research_prompt(ctx: &AppContext) -> Result<()> {
    use dialoguer::{Input, Select};

    let query: String = Input::with_theme(&ctx.theme())
        .with_prompt("Enter your research topic")
        .interact_text()?;

    let max_results: u64 = Input::with_theme(&ctx.theme())
        .with_prompt("Max search results (5-20)")
        .default(10)
        .validate_with(|n: &u64| {
            if (5..=20).contains(n) {
                Ok(())
            } else {
                Err("Choose between 5 and 20")
            }
        })
        .interact_text()?;

    let windows = TimeWindow::all();
    let labels: Vec<String> = windows.iter().map(|w| w.to_string()).collect();
    let window = Select::with_theme(&ctx.theme())
        .with_prompt("Time filter")
        .items(&labels)
        .default(0)
        .interact()?;

    let args = RunArgs {
        search: SearchArgs {
            query,
            max_results,
            time_window: labels[window].clone(),
        },
        select: Vec::new(),
        all: false,
        prompt: None,
        export: None,
    };
    cmd::report::run(ctx, args).await
}

async fn knowledge_base_search(ctx: &AppContext) -> Result<()> {
    use dialoguer::Input;

    let needle: String = Input::with_theme(&ctx.theme())
        .with_prompt("Search previous reports")
        .interact_text()?;

    cmd::history::list(
        ctx,
        HistoryArgs {
            limit: 10,
            search: Some(needle),
        },
    )
    .await
}
