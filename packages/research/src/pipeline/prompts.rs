//! LLM prompts for report generation.

/// Template used when the caller supplies none.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Generate a comprehensive report based on the following sources. Include key findings, analysis, and recommendations.";

/// Instructions appended after the sources.
pub const REPORT_INSTRUCTIONS: &str = r#"Please generate a comprehensive report based on the above sources. Include:
1. Executive Summary
2. Key Findings
3. Analysis
4. Recommendations
5. Sources Used

Format the report in Markdown."#;

/// Render source texts as numbered blocks: `Source 1:\n...`, blank-line separated.
pub fn format_sources(sources: &[String]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Source {}:\n{}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format the report prompt.
///
/// Sections are assembled in one pass, so braces or placeholder-looking text
/// in the query, template or sources are passed through untouched.
pub fn format_report_prompt(query: &str, sources: &[String], template: &str) -> String {
    let template = if template.trim().is_empty() {
        DEFAULT_PROMPT_TEMPLATE
    } else {
        template
    };

    format!(
        "Search Topic: {}\n\n{}\n\nSources:\n{}\n\n{}",
        query,
        template,
        format_sources(sources),
        REPORT_INSTRUCTIONS
    )
}
