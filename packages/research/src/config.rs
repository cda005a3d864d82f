//! Environment configuration.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::ai::DEFAULT_MODEL;
use crate::error::{ResearchError, Result};
use crate::export::DEFAULT_EXPORT_DIR;
use crate::security::{SearchCredentials, SecretString};

/// Knowledge base location when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://knowledge_base.db?mode=rwc";

/// Everything the pipeline needs from the environment.
#[derive(Clone)]
pub struct ResearchConfig {
    pub search: SearchCredentials,
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub database_url: String,
    pub export_dir: PathBuf,
}

impl ResearchConfig {
    /// Load configuration from process environment variables.
    ///
    /// `.env` files are the binary's concern; load one with `dotenvy`
    /// before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ResearchError::Config(format!("{} must be set", name).into()))
        };
        let optional = |name: &str, default: &str| -> String {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            search: SearchCredentials::new(required("GOOGLE_API_KEY")?, required("GOOGLE_CX")?),
            gemini_api_key: SecretString::new(required("GEMINI_API_KEY")?),
            gemini_model: optional("GEMINI_MODEL", DEFAULT_MODEL),
            database_url: optional("DATABASE_URL", DEFAULT_DATABASE_URL),
            export_dir: PathBuf::from(optional("EXPORT_DIR", DEFAULT_EXPORT_DIR)),
        })
    }
}

impl fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("search", &self.search)
            .field("gemini_api_key", &self.gemini_api_key)
            .field("gemini_model", &self.gemini_model)
            .field("database_url", &self.database_url)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}
