//! HTTP client abstraction for testability

use super::ProviderError;
use std::future::Future;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock HTTP clients in tests. A 429 response surfaces as
/// [`ProviderError::RateLimited`] so callers can distinguish it from other
/// failures.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP GET request with Bearer token authentication.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `bearer_token` - The bearer token for Authorization header
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP POST request with a JSON body and custom
    /// headers.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `json_body` - JSON body as a string
    /// * `headers` - Slice of (header_name, header_value) tuples
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn post_json(
        &self,
        url: &str,
        json_body: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("chromalist/", env!("CARGO_PKG_VERSION"));

/// Async HTTP client implementation using reqwest.
///
/// Uses non-blocking I/O with a pooled connection set sized for fetching
/// many poster images in parallel.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(30)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            // Keep connections alive for parallel poster fetches
            .pool_max_idle_per_host(64)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = match request.send().await {
            Ok(resp) => {
                trace!(url = url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::Http(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(url = url, "HTTP 429, upstream is rate limiting");
            return Err(ProviderError::RateLimited(format!("HTTP 429 from {}", url)));
        }
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(ProviderError::Http(format!("HTTP {} from {}", status, url)));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::Http(format!("Failed to read response: {}", e)))
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP GET request starting");
        self.send(self.client.get(url), url).await
    }

    async fn get_with_bearer(&self, url: &str, bearer_token: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "authenticated HTTP GET request starting");
        let request = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", bearer_token));
        self.send(request, url).await
    }

    async fn post_json(
        &self,
        url: &str,
        json_body: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, ProviderError> {
        debug!(url = url, bytes = json_body.len(), "HTTP POST request starting");
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(request, url).await
    }
}
