//! User-facing operations.
//!
//! Each method is one user action: it normalizes the input, runs the relevant
//! pipeline and writes the outcome into the vault.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::MetadataCache;
use crate::client::{ArxivClient, CitationClient, SummaryClient};
use crate::config::Config;
use crate::error::{AssistantError, AssistantResult};
use crate::formatters::format_summary_document;
use crate::identifier;
use crate::materializer::{EnrichReport, Materializer};
use crate::metadata::MetadataFetcher;
use crate::models::{PaperMetadata, SearchPaper, SummaryResult};
use crate::summarizer::Summarizer;
use crate::vault::DocumentStore;

/// Entry point tying the registries, the summarizer and the vault together.
#[derive(Debug, Clone)]
pub struct PaperAssistant {
    config: Config,
    arxiv: ArxivClient,
    citations: CitationClient,
    metadata: MetadataFetcher,
    summarizer: Summarizer,
    materializer: Materializer,
}

impl PaperAssistant {
    /// Create an assistant with a fresh metadata cache.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> AssistantResult<Self> {
        let cache = MetadataCache::new(config.metadata_cache_max_size);
        Self::with_cache(config, store, cache)
    }

    /// Create an assistant that reads through an existing cache.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn with_cache(
        config: Config,
        store: Arc<dyn DocumentStore>,
        cache: MetadataCache,
    ) -> AssistantResult<Self> {
        let arxiv = ArxivClient::new(&config)?;
        let citations = CitationClient::new(&config)?;
        let summary = SummaryClient::new(&config)?;

        if !summary.has_api_key() {
            tracing::debug!("No summarization API key configured");
        }

        Ok(Self {
            metadata: MetadataFetcher::new(arxiv.clone(), citations.clone(), cache),
            summarizer: Summarizer::new(summary, config.polling),
            materializer: Materializer::new(store, config.materialize),
            arxiv,
            citations,
            config,
        })
    }

    /// The metadata fetcher, for callers that want records without writing them.
    #[must_use]
    pub fn metadata(&self) -> &MetadataFetcher {
        &self.metadata
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Summarize the paper at `input` and append the summary to `note`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for anything that is not an arXiv abstract or PDF URL,
    /// otherwise whatever the summarization job ends in.
    pub async fn summarize(&self, note: &str, input: &str) -> AssistantResult<SummaryResult> {
        let url = identifier::normalize(input);
        if !identifier::validate(&url) {
            return Err(AssistantError::invalid_input(input, "not an arXiv abstract URL"));
        }

        tracing::info!(%url, note, "Summarizing paper");
        let result = self
            .summarizer
            .summarize(&url, &self.config.target_language, self.config.translate())
            .await?;

        self.materializer.write_summary(note, &format_summary_document(&result)).await?;
        Ok(result)
    }

    /// Enrich `note` with metadata and the citation graph of the paper at `input`.
    ///
    /// # Errors
    ///
    /// `InvalidInput`, `Upstream` for the arXiv registry, `CapabilityUnavailable`
    /// or `Vault` from the document store.
    pub async fn enrich(&self, note: &str, input: &str) -> AssistantResult<EnrichReport> {
        let metadata = self.metadata.fetch(input).await?;
        tracing::info!(arxiv_id = %metadata.arxiv_id, note, "Enriching note");
        self.materializer.enrich_note(note, &metadata).await
    }

    /// Fetch metadata without touching the vault.
    pub async fn lookup(&self, input: &str) -> AssistantResult<Arc<PaperMetadata>> {
        self.metadata.fetch(input).await
    }

    /// Download the PDF of the paper at `input` into the configured directory.
    ///
    /// # Errors
    ///
    /// `InvalidInput`, or `Upstream` on download or write failure.
    pub async fn download_pdf(&self, input: &str) -> AssistantResult<PathBuf> {
        let id = identifier::extract_id(input)?;
        let path = self.arxiv.download_pdf(&id, &self.config.pdf_dir).await?;
        tracing::info!(arxiv_id = %id, path = %path.display(), "PDF downloaded");
        Ok(path)
    }

    /// Free-text citation registry search.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty query, `Upstream` once retries are spent.
    pub async fn search(&self, query: &str, limit: u32) -> AssistantResult<Vec<SearchPaper>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::invalid_input(query, "empty search query"));
        }
        Ok(self.citations.search(query, limit.clamp(1, 100)).await?)
    }
}
