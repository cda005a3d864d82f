//! HTTP transport seam.
//!
//! Both the search client and the page extractors issue their GET requests
//! through this trait, so a test can swap in `MockTransport` and assert on
//! exactly which requests were made (and that none were made for rejected
//! URLs).

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{FetchError, FetchResult};

/// An outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Target URL, without query parameters supplied via `query`.
    pub url: String,

    /// Query parameters appended to the URL.
    pub query: Vec<(String, String)>,

    /// Extra request headers.
    pub headers: Vec<(String, String)>,

    /// Per-request timeout; the transport default applies when unset.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a GET request for a URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Bound the request duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response body with its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// URL after redirects.
    pub final_url: String,

    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, final_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `FetchError::Status`.
    pub fn error_for_status(self) -> FetchResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status: self.status,
                url: self.final_url,
            })
        }
    }
}

/// Blocking-free HTTP GET abstraction.
///
/// Implementations must return `Ok` for any response that arrived, whatever
/// its status; callers decide what a non-2xx status means for them.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, request: &HttpRequest) -> FetchResult<HttpResponse>;

    /// Get the transport name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
