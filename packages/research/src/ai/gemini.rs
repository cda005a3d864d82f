//! Gemini implementation of the report generator.
//!
//! # Example
//!
//! ```rust,ignore
//! use research::ai::GeminiGenerator;
//!
//! let generator = GeminiGenerator::new("api-key").with_model("gemini-1.5-pro");
//! let report = generator.generate_report("topic", &texts, DEFAULT_PROMPT_TEMPLATE).await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ResearchError, Result};
use crate::pipeline::prompts::format_report_prompt;
use crate::security::SecretString;
use crate::traits::generator::ReportGenerator;

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound for one generation request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini-based report generator.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiGenerator {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the model (default: gemini-1.5-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout (default: 120 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| ResearchError::Generation(e.without_url().to_string().into()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ResearchError::Generation(
                format!("Gemini API error ({}): {}", status, error_text).into(),
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Generation(e.to_string().into()))?;

        body.into_text()
    }
}

#[async_trait]
impl ReportGenerator for GeminiGenerator {
    async fn generate_report(
        &self,
        query: &str,
        sources: &[String],
        template: &str,
    ) -> Result<String> {
        let prompt = format_report_prompt(query, sources, template);
        debug!(
            model = %self.model,
            sources = sources.len(),
            prompt_chars = prompt.len(),
            "Requesting report"
        );

        self.complete(&prompt).await.inspect_err(|e| {
            warn!(model = %self.model, error = %e, "Report generation failed");
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate; blocked or empty answers are errors.
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ResearchError::Generation(
                format!("prompt blocked: {}", reason).into(),
            ));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ResearchError::Generation("No response from Gemini".into()));
        }
        Ok(text)
    }
}
