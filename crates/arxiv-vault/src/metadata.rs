//! Metadata fetching: arXiv record plus citation graph, cached per identifier.

use std::sync::Arc;

use crate::cache::MetadataCache;
use crate::client::{ArxivClient, ArxivEntry, CitationClient};
use crate::error::AssistantResult;
use crate::identifier::{self, ArxivId};
use crate::models::{
    CitationInfo, NO_ABSTRACT, PaperMetadata, UNKNOWN_DATE, UNKNOWN_TITLE,
};

/// Fetches [`PaperMetadata`] through an injected [`MetadataCache`].
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    arxiv: ArxivClient,
    citations: CitationClient,
    cache: MetadataCache,
}

impl MetadataFetcher {
    /// Create a fetcher over the given clients and cache.
    #[must_use]
    pub fn new(arxiv: ArxivClient, citations: CitationClient, cache: MetadataCache) -> Self {
        Self { arxiv, citations, cache }
    }

    /// The cache this fetcher reads through.
    #[must_use]
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Metadata for any accepted URL or identifier form.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when no identifier can be extracted, `Upstream` when the
    /// arXiv registry fails. Citation registry failures are not errors.
    pub async fn fetch(&self, input: &str) -> AssistantResult<Arc<PaperMetadata>> {
        let id = identifier::extract_id(input)?;
        self.fetch_id(&id).await
    }

    /// Metadata for a parsed identifier.
    pub async fn fetch_id(&self, id: &ArxivId) -> AssistantResult<Arc<PaperMetadata>> {
        let key = id.cache_key();

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(arxiv_id = %id, "Metadata cache hit");
            return Ok(cached);
        }

        let entry = self.arxiv.fetch_entry(id).await?;
        // Not complete, and not cached, until citation data is attached.
        let citations = self.citations.fetch_citation_info(id).await;
        let metadata = Arc::new(build_metadata(id, entry, citations));

        self.cache.insert(key, Arc::clone(&metadata)).await;
        tracing::info!(arxiv_id = %id, title = %metadata.title, "Fetched paper metadata");

        Ok(metadata)
    }

    /// Drop any cached record for `id` and fetch it again.
    pub async fn refresh(&self, id: &ArxivId) -> AssistantResult<Arc<PaperMetadata>> {
        self.cache.invalidate(&id.cache_key()).await;
        self.fetch_id(id).await
    }
}

fn build_metadata(id: &ArxivId, entry: ArxivEntry, citations: CitationInfo) -> PaperMetadata {
    PaperMetadata {
        arxiv_id: id.versioned(),
        title: entry.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        link: id.abs_url(),
        published: entry.published.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        authors: entry.authors,
        r#abstract: entry.summary.unwrap_or_else(|| NO_ABSTRACT.to_string()),
        categories: entry.categories,
        doi: entry.doi,
        citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metadata_placeholders() {
        let id = identifier::extract_id("2301.00001").unwrap();
        let metadata = build_metadata(&id, ArxivEntry::default(), CitationInfo::default());

        assert_eq!(metadata.title, UNKNOWN_TITLE);
        assert_eq!(metadata.published, UNKNOWN_DATE);
        assert_eq!(metadata.r#abstract, NO_ABSTRACT);
        assert_eq!(metadata.link, "https://arxiv.org/abs/2301.00001");
        assert_eq!(metadata.author_names(), crate::models::UNKNOWN_AUTHORS);
    }
}
