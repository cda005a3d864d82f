//! Terminal rendering for results and reports

use colored::Colorize;
use research::{Report, SearchResult};

const TITLE_WIDTH: usize = 60;

/// Shorten a result title for pick lists.
pub fn short_title(result: &SearchResult) -> String {
    let title = if result.title.trim().is_empty() {
        result.url.as_str()
    } else {
        result.title.trim()
    };

    if title.chars().count() > TITLE_WIDTH {
        format!("{}...", title.chars().take(TITLE_WIDTH).collect::<String>())
    } else {
        title.to_string()
    }
}

pub fn print_results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        println!("{:>3}. {}", i + 1, short_title(result).bold());
        println!("     {}", result.url.blue());
        if !result.snippet.trim().is_empty() {
            println!("     {}", result.snippet.trim().dimmed());
        }
    }
}

/// Print Markdown with headings and bullets highlighted.
pub fn print_markdown(markdown: &str) {
    for line in markdown.lines() {
        println!("{}", style_markdown_line(line));
    }
}

fn style_markdown_line(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        trimmed.trim_start_matches('#').trim().bold().cyan().to_string()
    } else if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        format!("  {} {}", "•".cyan(), item)
    } else {
        line.to_string()
    }
}

/// One-line listing entry: `[id] query - date (n sources)`.
pub fn report_line(report: &Report) -> String {
    format!(
        "{} {} {}",
        format!("[{}]", report.id).yellow(),
        report.label(),
        format!("({} sources)", report.sources.len()).dimmed()
    )
}

pub fn print_report(report: &Report) {
    println!("{}", report_line(report));
    println!();
    print_markdown(&report.content);
    println!();
    println!("{}", "Sources:".bold());
    for url in &report.sources {
        println!("- {}", url.blue());
    }
}
