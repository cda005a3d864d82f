//! Research pipeline - from selected sources to a generated report.
//!
//! The pipeline orchestrates:
//! - Normalization of extracted text (whitespace, length cap)
//! - Corpus aggregation, one positional entry per selected source
//! - Prompt assembly for the report generator
//! - The request-scoped session driven by `Researcher`

pub mod corpus;
pub mod normalize;
pub mod prompts;
pub mod session;

pub use corpus::{build_corpus, Corpus, CorpusEntry};
pub use normalize::{normalize, MAX_CONTENT_CHARS};
pub use prompts::{format_report_prompt, format_sources, DEFAULT_PROMPT_TEMPLATE};
pub use session::{ResearchSession, Researcher, SourceSelection, DEFAULT_MAX_RESULTS};
