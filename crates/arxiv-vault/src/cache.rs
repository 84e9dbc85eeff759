//! Read-through cache for paper metadata.

use std::sync::Arc;

use moka::future::Cache;

use crate::models::PaperMetadata;

/// Metadata records keyed by normalized arXiv identifier.
///
/// Cloning shares the underlying store. Entries are immutable and live for the
/// life of the cache; concurrent inserts for one key are last-writer-wins.
#[derive(Clone)]
pub struct MetadataCache {
    inner: Cache<String, Arc<PaperMetadata>>,
}

impl MetadataCache {
    /// Create a cache holding at most `max_capacity` records.
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self { inner: Cache::builder().max_capacity(max_capacity).build() }
    }

    /// Look up a record.
    pub async fn get(&self, key: &str) -> Option<Arc<PaperMetadata>> {
        self.inner.get(key).await
    }

    /// Store a record, replacing any previous one.
    pub async fn insert(&self, key: impl Into<String>, metadata: Arc<PaperMetadata>) {
        self.inner.insert(key.into(), metadata).await;
    }

    /// Drop a record so the next fetch goes to the network.
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Whether a record is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache").field("entries", &self.inner.entry_count()).finish()
    }
}
