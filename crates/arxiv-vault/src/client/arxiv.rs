//! arXiv export API and PDF client.

use std::path::{Path, PathBuf};

use reqwest_middleware::ClientWithMiddleware;

use super::atom::{ArxivEntry, parse_feed};
use super::{build_http_client, handle_response};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::identifier::ArxivId;

/// Bibliographic registry client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Export API base URL.
    api_url: String,

    /// PDF base URL.
    pdf_base_url: String,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(config, None)?,
            api_url: config.arxiv_api_url.clone(),
            pdf_base_url: config.pdf_base_url.clone(),
        })
    }

    /// Fetch the feed entry for one identifier.
    ///
    /// # Errors
    ///
    /// Returns error on non-success status, an unparseable feed, or a feed
    /// without entries.
    pub async fn fetch_entry(&self, id: &ArxivId) -> ClientResult<ArxivEntry> {
        let url = format!("{}/query", self.api_url);
        let params = [("id_list", id.versioned())];

        tracing::debug!(arxiv_id = %id, "Fetching arXiv metadata");

        let response = self.client.get(&url).query(&params).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;

        parse_feed(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::malformed(format!("no arXiv entry for {id}")))
    }

    /// Download the PDF for `id` into `dir` as `<id>.pdf`.
    ///
    /// # Errors
    ///
    /// Returns error on non-success status or when the file cannot be written.
    pub async fn download_pdf(&self, id: &ArxivId, dir: &Path) -> ClientResult<PathBuf> {
        let url = id.pdf_url(&self.pdf_base_url);

        tracing::info!(arxiv_id = %id, %url, "Downloading PDF");

        let response = self.client.get(&url).send().await?;
        let response = handle_response(response).await?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(id.pdf_file_name());
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(path = %path.display(), size = bytes.len(), "PDF saved");
        Ok(path)
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}
