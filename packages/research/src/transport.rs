//! `reqwest`-backed HTTP transport.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Default upper bound for any single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production transport over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a 30 second timeout and at most 5 redirects.
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> FetchResult<HttpResponse> {
        // Query strings may carry API keys; log the bare URL only.
        debug!(url = %request.url, "HTTP GET starting");

        let mut builder = self.client.get(&request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            let e = e.without_url();
            warn!(url = %request.url, error = %e, "HTTP request failed");
            classify(e, &request.url)
        })?;

        let status = response.status().as_u16();
        let mut final_url = response.url().clone();
        final_url.set_query(None);

        let body = response
            .text()
            .await
            .map_err(|e| classify(e.without_url(), &request.url))?;

        debug!(url = %request.url, status, bytes = body.len(), "HTTP GET finished");

        Ok(HttpResponse::new(status, final_url.to_string(), body))
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

fn classify(error: reqwest::Error, url: &str) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(Box::new(error.without_url()))
    }
}
