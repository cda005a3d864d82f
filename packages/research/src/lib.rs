//! Web Research Library
//!
//! Turns a research topic into a Markdown report backed by live web sources:
//! search, let a person pick sources, extract and normalize their text, and
//! hand the positional corpus to a generative model.
//!
//! # Design Philosophy
//!
//! - Best-effort acquisition: one dead source never aborts a report
//! - Every degraded result still says why (`SearchStop`, `ExtractionOutcome`)
//! - Strictly sequential network calls, each with a bounded timeout
//! - Request-scoped state owned by the caller, no caching across requests
//!
//! # Usage
//!
//! ```rust,ignore
//! use research::{ContentExtractor, GoogleSearcher, ReqwestTransport, ResearchSession, Researcher};
//! use research::ai::GeminiGenerator;
//!
//! let config = ResearchConfig::from_env()?;
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let researcher = Researcher::new(
//!     GoogleSearcher::new(transport.clone(), config.search.clone()),
//!     ContentExtractor::new(transport),
//!     GeminiGenerator::new(config.gemini_api_key.clone()),
//! );
//!
//! let mut session = ResearchSession::new("community solar programs");
//! researcher.search(&mut session).await;
//! session.select(0);
//! let report = researcher.generate(&mut session, DEFAULT_PROMPT_TEMPLATE).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (HttpTransport, WebSearcher, ContentStrategy, ReportGenerator, ReportStore)
//! - [`searchers`] - Google Custom Search client
//! - [`extractors`] - Page fetching and text extraction strategies
//! - [`pipeline`] - Normalization, corpus aggregation, prompts and sessions
//! - [`ai`] - Gemini report generator
//! - [`stores`] - Report storage implementations (MemoryStore, SqliteStore)
//! - [`export`] - PDF, DOCX and TXT export
//! - [`security`] - Credential handling and URL validation
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod config;
pub mod error;
pub mod export;
pub mod extractors;
pub mod pipeline;
pub mod searchers;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod transport;
pub mod types;

// Re-export core types at crate root
pub use config::ResearchConfig;
pub use error::{FetchError, ResearchError, Result, SecurityError};
pub use export::{ExportFormat, ReportExporter};
pub use extractors::{ContentExtractor, FallbackStrategy, StructuredStrategy};
pub use pipeline::{
    build_corpus, normalize, Corpus, CorpusEntry, ResearchSession, Researcher, SourceSelection,
    DEFAULT_PROMPT_TEMPLATE, MAX_CONTENT_CHARS,
};
pub use searchers::GoogleSearcher;
pub use security::{is_valid, SearchCredentials, SecretString, UrlValidator};
pub use stores::MemoryStore;
pub use traits::{
    generator::ReportGenerator,
    searcher::{MockWebSearcher, SearchOutcome, SearchResult, SearchStop, TimeWindow, WebSearcher},
    store::ReportStore,
    strategy::ContentStrategy,
    transport::{HttpRequest, HttpResponse, HttpTransport},
};
pub use transport::ReqwestTransport;
pub use types::{
    content::{ExtractedContent, ExtractionOutcome},
    report::{NewReport, Report},
};

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

pub use testing::{MockGenerator, MockTransport};
