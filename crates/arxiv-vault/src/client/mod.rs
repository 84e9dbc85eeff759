//! HTTP clients for the registries the assistant talks to.
//!
//! Every client is built the same way:
//! - Connection pooling via reqwest
//! - Request/connect timeouts from [`Config`]
//! - Retry middleware only where a policy is given (citation search)

mod arxiv;
mod atom;
mod citations;
mod summary;

pub use arxiv::ArxivClient;
pub use atom::{ArxivEntry, parse_feed};
pub use citations::CitationClient;
pub use summary::{RawResponse, SummaryClient};

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Build an HTTP client, optionally wrapped in transient-error retries.
pub(crate) fn build_http_client(
    config: &Config,
    retry_policy: Option<ExponentialBackoff>,
) -> ClientResult<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(api::USER_AGENT)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let mut builder = ClientBuilder::new(client);
    if let Some(policy) = retry_policy {
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }

    Ok(builder.build())
}

/// Turn a non-success status into [`ClientError::UnexpectedStatus`].
pub(crate) async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::unexpected_status(status.as_u16(), text))
}
