//! Summarization service client.
//!
//! Calls return the status and body as-is rather than failing on error
//! statuses: the job state machine decides what each status means.

use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Value, json};

use super::build_http_client;
use crate::config::Config;
use crate::error::ClientResult;

/// Status and body of one service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is exactly 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Remote summarization service.
#[derive(Clone)]
pub struct SummaryClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Service base URL.
    base_url: String,

    /// API key (optional).
    api_key: Option<String>,
}

impl SummaryClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(config, None)?,
            base_url: config.summary_api_url.clone(),
            api_key: config.summary_api_key.clone(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask whether a completed result already exists for `(url, language)`.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure.
    pub async fn check(&self, url: &str, target_language: &str) -> ClientResult<RawResponse> {
        let body = json!({
            "url": url,
            "target_language": target_language,
            "status": "COMPLETED",
        });
        self.post("check", &body).await
    }

    /// Submit a new summarization job.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure.
    pub async fn submit(
        &self,
        url: &str,
        target_language: &str,
        translate: bool,
    ) -> ClientResult<RawResponse> {
        let body = json!({
            "url": url,
            "api_key": self.api_key.as_deref().unwrap_or_default(),
            "translate": translate,
            "target_language": target_language,
        });
        self.post("service", &body).await
    }

    /// Poll a submitted job.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure.
    pub async fn status(&self, request_id: &str) -> ClientResult<RawResponse> {
        let body = json!({ "requestId": request_id });
        self.post("status", &body).await
    }

    /// Make a POST request.
    async fn post(&self, endpoint: &str, body: &Value) -> ClientResult<RawResponse> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let body_str = serde_json::to_string(body)?;

        tracing::debug!(%url, "Posting to summarization service");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for SummaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}
