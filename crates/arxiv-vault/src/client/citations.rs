//! Citation registry client.
//!
//! Two paths with opposite failure policies:
//! - [`CitationClient::fetch_citation_info`] never fails; an outage yields an
//!   empty [`CitationInfo`]
//! - [`CitationClient::search`] retries a fixed number of times with a flat delay,
//!   then propagates the error

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{Jitter, policies::ExponentialBackoff};

use super::{build_http_client, handle_response};
use crate::config::{Config, fields};
use crate::error::ClientResult;
use crate::identifier::ArxivId;
use crate::models::{CitationGraph, CitationInfo, SearchPaper, SearchResult};

/// Semantic Scholar client for citation graphs and search.
#[derive(Clone)]
pub struct CitationClient {
    /// Plain client for graph lookups.
    client: ClientWithMiddleware,

    /// Client with fixed-count retry for search.
    search_client: ClientWithMiddleware,

    /// Legacy paper API base URL.
    citation_api_url: String,

    /// Graph API base URL.
    search_api_url: String,
}

impl CitationClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        // base 1 with equal bounds and no jitter: the same delay before every retry
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.search_retry_delay, config.search_retry_delay)
            .jitter(Jitter::None)
            .base(1)
            .build_with_max_retries(config.search_max_retries);

        Ok(Self {
            client: build_http_client(config, None)?,
            search_client: build_http_client(config, Some(retry_policy))?,
            citation_api_url: config.citation_api_url.clone(),
            search_api_url: config.search_api_url.clone(),
        })
    }

    /// Citation counts and influential neighbours of `id`.
    ///
    /// Any failure is logged and replaced by `CitationInfo::default()` so that a
    /// citation registry outage only makes metadata poorer.
    pub async fn fetch_citation_info(&self, id: &ArxivId) -> CitationInfo {
        match self.fetch_graph(id).await {
            Ok(graph) => {
                let info = CitationInfo::from_graph(graph);
                tracing::debug!(
                    arxiv_id = %id,
                    cited_by = info.cited_by_count,
                    citing = info.citing_count,
                    influential_citations = info.influential_citations.len(),
                    influential_references = info.influential_references.len(),
                    "Fetched citation graph"
                );
                info
            }
            Err(err) => {
                tracing::warn!(
                    arxiv_id = %id,
                    error = %err,
                    "Citation registry unavailable, continuing without citation data"
                );
                CitationInfo::default()
            }
        }
    }

    /// Fetch the raw citation graph.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or malformed JSON.
    pub async fn fetch_graph(&self, id: &ArxivId) -> ClientResult<CitationGraph> {
        let url = format!("{}/paper/{}", self.citation_api_url, id.compound_id());

        let response = self.client.get(&url).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Search papers by free text.
    ///
    /// # Errors
    ///
    /// Returns error once the retry budget is spent.
    pub async fn search(&self, query: &str, limit: u32) -> ClientResult<Vec<SearchPaper>> {
        let url = format!("{}/paper/search", self.search_api_url);
        let params = [
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", fields::SEARCH.join(",")),
        ];

        tracing::debug!(query, limit, "Searching citation registry");

        let response = self.search_client.get(&url).query(&params).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;
        let result: SearchResult = serde_json::from_str(&body)?;

        Ok(result.data)
    }
}

impl std::fmt::Debug for CitationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationClient").field("citation_api_url", &self.citation_api_url).finish()
    }
}
