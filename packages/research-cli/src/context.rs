//! Application context with shared state and utilities

use anyhow::{bail, Context, Result};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::sync::Arc;

use research::ai::GeminiGenerator;
use research::{
    ContentExtractor, GoogleSearcher, ReportExporter, ReqwestTransport, ResearchConfig,
    Researcher, SqliteStore,
};

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: ResearchConfig,
}

impl AppContext {
    pub fn new(quiet: bool) -> Result<Self> {
        let config = ResearchConfig::from_env()
            .context("Missing configuration. Create a .env file or set the environment variables.")?;
        tracing::debug!(config = ?config, "Loaded configuration");
        Ok(Self { quiet, config })
    }

    /// Search, extraction and generation wired to the live services.
    pub fn researcher(&self) -> Result<Researcher<GoogleSearcher, GeminiGenerator>> {
        let transport = Arc::new(ReqwestTransport::new().context("Failed to build HTTP client")?);
        let searcher = GoogleSearcher::new(transport.clone(), self.config.search.clone());
        let generator = GeminiGenerator::new(self.config.gemini_api_key.clone())
            .with_model(self.config.gemini_model.clone());
        Ok(Researcher::new(
            searcher,
            ContentExtractor::new(transport),
            generator,
        ))
    }

    /// Open the knowledge base.
    pub async fn store(&self) -> Result<SqliteStore> {
        SqliteStore::new(&self.config.database_url)
            .await
            .with_context(|| format!("Failed to open knowledge base at {}", self.config.database_url))
    }

    pub fn exporter(&self) -> ReportExporter {
        ReportExporter::new(self.config.export_dir.clone())
    }

    /// Whether prompts can be shown.
    pub fn interactive(&self) -> bool {
        !self.quiet && Term::stdout().is_term()
    }

    /// Fail with a usage hint when prompts cannot be shown.
    pub fn require_interactive(&self) -> Result<()> {
        if !self.interactive() {
            bail!("No command given and no interactive terminal. Run `research --help` for usage.");
        }
        Ok(())
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if !self.interactive() {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_context() -> AppContext {
        let config = ResearchConfig::from_lookup(|name| match name {
            "GOOGLE_API_KEY" | "GOOGLE_CX" | "GEMINI_API_KEY" => Some("value".to_string()),
            _ => None,
        })
        .unwrap();
        AppContext {
            quiet: true,
            config,
        }
    }

    #[test]
    fn test_quiet_context_never_prompts() {
        let ctx = quiet_context();

        assert!(!ctx.interactive());
        assert!(ctx.require_interactive().is_err());
        assert!(!ctx.confirm("Delete?", false).unwrap());
        assert!(ctx.confirm("Delete?", true).unwrap());
    }
}
