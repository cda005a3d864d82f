//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during research operations.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Fetching a page or search page failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Report generation failed or returned nothing
    #[error("generation error: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Writing an export file failed
    #[error("export error: {0}")]
    Export(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Generation was requested with an empty source selection
    #[error("no sources selected")]
    NoSourcesSelected,

    /// Report not found in store
    #[error("report not found: {id}")]
    NotFound { id: i64 },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that can occur while talking to a remote host.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Remote answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Request exceeded its timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// URL rejections, raised before any network call.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, javascript:)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata services)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// Host is not a well-formed DNS name or IP literal
    #[error("malformed host: {0}")]
    MalformedHost(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
