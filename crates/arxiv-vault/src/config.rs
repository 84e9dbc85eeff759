//! Configuration for the arXiv vault assistant.

use std::path::PathBuf;
use std::time::Duration;

use crate::materializer::CollisionPolicy;

/// Registry endpoints and HTTP constants.
pub mod api {
    use std::time::Duration;

    /// arXiv export API (Atom feed).
    pub const ARXIV_API: &str = "https://export.arxiv.org/api";

    /// arXiv PDF host.
    pub const ARXIV_PDF: &str = "https://arxiv.org/pdf";

    /// Semantic Scholar legacy paper API (carries `isInfluential` flags).
    pub const CITATION_API: &str = "https://api.semanticscholar.org/v1";

    /// Semantic Scholar Graph API (paper search).
    pub const SEARCH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Summarization service used when none is configured.
    pub const SUMMARY_API: &str = "http://localhost:8080";

    /// User agent sent to every registry.
    pub const USER_AGENT: &str = concat!("arxiv-vault/", env!("CARGO_PKG_VERSION"));

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum number of cached metadata records.
    pub const METADATA_CACHE_MAX_SIZE: u64 = 1000;

    /// Retries on the citation search path.
    pub const SEARCH_MAX_RETRIES: u32 = 3;

    /// Flat delay between citation search retries.
    pub const SEARCH_RETRY_DELAY: Duration = Duration::from_secs(1);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Summarization job timing.
pub mod polling {
    use std::time::Duration;

    /// Wait between an accepted submission and the first status request.
    pub const INITIAL_DELAY: Duration = Duration::from_secs(5);

    /// First interval between status requests.
    pub const INITIAL_INTERVAL: Duration = Duration::from_secs(2);

    /// Ceiling for the backoff interval.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(10);

    /// Status requests issued before giving up.
    pub const MAX_ATTEMPTS: u32 = 60;

    /// Growth factor applied to the interval after every unresolved attempt.
    pub const BACKOFF_FACTOR: f64 = 1.5;

    /// Status code the service answers a new submission with.
    pub const SUBMIT_ACCEPTED: u16 = 202;
}

/// Paper field sets for Graph API requests.
pub mod fields {
    /// Fields requested by citation search.
    pub const SEARCH: &[&str] =
        &["paperId", "title", "year", "venue", "citationCount", "authors", "externalIds"];
}

/// Timing of the summarization state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingConfig {
    /// Wait after submission, before the first poll.
    pub initial_delay: Duration,

    /// First backoff interval.
    pub initial_interval: Duration,

    /// Backoff ceiling.
    pub max_interval: Duration,

    /// Hard ceiling on status requests.
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_delay: polling::INITIAL_DELAY,
            initial_interval: polling::INITIAL_INTERVAL,
            max_interval: polling::MAX_INTERVAL,
            max_attempts: polling::MAX_ATTEMPTS,
        }
    }
}

/// How influential papers are written into the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Create one linked note per influential paper instead of plain bullets.
    pub link_influential: bool,

    /// Present influential lists by descending citation count.
    pub rank_by_citations: bool,

    /// Rename the enriched note after the paper title.
    pub rename_to_title: bool,

    /// What to do when a note with the target name already exists.
    pub collision_policy: CollisionPolicy,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            link_influential: true,
            rank_by_citations: false,
            rename_to_title: false,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

/// Assistant configuration.
#[derive(Clone)]
pub struct Config {
    /// Summarization service API key (optional).
    pub summary_api_key: Option<String>,

    /// arXiv export API base URL.
    pub arxiv_api_url: String,

    /// arXiv PDF base URL.
    pub pdf_base_url: String,

    /// Citation registry base URL.
    pub citation_api_url: String,

    /// Citation search base URL.
    pub search_api_url: String,

    /// Summarization service base URL.
    pub summary_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Maximum number of cached metadata records.
    pub metadata_cache_max_size: u64,

    /// Retries on the citation search path.
    pub search_max_retries: u32,

    /// Flat delay between citation search retries.
    pub search_retry_delay: Duration,

    /// Summarization job timing.
    pub polling: PollingConfig,

    /// Language the summary is requested in.
    pub target_language: String,

    /// Directory PDFs are downloaded into.
    pub pdf_dir: PathBuf,

    /// Influential paper materialization.
    pub materialize: MaterializeOptions,
}

impl Config {
    /// Create a new configuration with an optional summarization API key.
    #[must_use]
    pub fn new(summary_api_key: Option<String>) -> Self {
        Self {
            summary_api_key,
            arxiv_api_url: api::ARXIV_API.to_string(),
            pdf_base_url: api::ARXIV_PDF.to_string(),
            citation_api_url: api::CITATION_API.to_string(),
            search_api_url: api::SEARCH_API.to_string(),
            summary_api_url: api::SUMMARY_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            metadata_cache_max_size: api::METADATA_CACHE_MAX_SIZE,
            search_max_retries: api::SEARCH_MAX_RETRIES,
            search_retry_delay: api::SEARCH_RETRY_DELAY,
            polling: PollingConfig::default(),
            target_language: "English".to_string(),
            pdf_dir: PathBuf::from("papers"),
            materialize: MaterializeOptions::default(),
        }
    }

    /// Create a test configuration routing every registry to one mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            summary_api_key: Some("test-key".to_string()),
            arxiv_api_url: format!("{}/api", base_url),
            pdf_base_url: format!("{}/pdf", base_url),
            citation_api_url: format!("{}/v1", base_url),
            search_api_url: format!("{}/graph/v1", base_url),
            summary_api_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            metadata_cache_max_size: 100,
            search_max_retries: 2,
            search_retry_delay: Duration::ZERO, // No waiting between retries in tests
            polling: PollingConfig {
                initial_delay: Duration::ZERO,
                initial_interval: Duration::from_millis(1),
                max_interval: Duration::from_millis(5),
                max_attempts: 5,
            },
            target_language: "English".to_string(),
            pdf_dir: std::env::temp_dir(),
            materialize: MaterializeOptions::default(),
        }
    }

    /// Create configuration from environment variables (and a `.env` file if present).
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(std::env::var("SUMMARY_API_KEY").ok());

        if let Ok(url) = std::env::var("ARXIV_VAULT_SUMMARY_URL") {
            config.summary_api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(language) = std::env::var("ARXIV_VAULT_LANGUAGE") {
            config.target_language = language;
        }
        if let Ok(dir) = std::env::var("ARXIV_VAULT_PDF_DIR") {
            config.pdf_dir = PathBuf::from(dir);
        }
        if let Ok(attempts) = std::env::var("ARXIV_VAULT_MAX_POLL_ATTEMPTS") {
            config.polling.max_attempts = attempts
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid ARXIV_VAULT_MAX_POLL_ATTEMPTS: {e}"))?;
        }

        Ok(config)
    }

    /// Check if a summarization API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.summary_api_key.is_some()
    }

    /// Whether summaries must be translated out of English.
    #[must_use]
    pub fn translate(&self) -> bool {
        !self.target_language.eq_ignore_ascii_case("english")
            && !self.target_language.eq_ignore_ascii_case("en")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("arxiv_api_url", &self.arxiv_api_url)
            .field("pdf_base_url", &self.pdf_base_url)
            .field("citation_api_url", &self.citation_api_url)
            .field("search_api_url", &self.search_api_url)
            .field("summary_api_url", &self.summary_api_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("metadata_cache_max_size", &self.metadata_cache_max_size)
            .field("search_max_retries", &self.search_max_retries)
            .field("search_retry_delay", &self.search_retry_delay)
            .field("polling", &self.polling)
            .field("target_language", &self.target_language)
            .field("pdf_dir", &self.pdf_dir)
            .field("materialize", &self.materialize)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.summary_api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.polling.max_attempts, polling::MAX_ATTEMPTS);
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.summary_api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_translate_only_for_non_english() {
        let mut config = Config::default();
        assert!(!config.translate());

        config.target_language = "en".to_string();
        assert!(!config.translate());

        config.target_language = "Korean".to_string();
        assert!(config.translate());
    }

    #[test]
    fn test_for_testing_routes_to_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.arxiv_api_url, "http://127.0.0.1:9999/api");
        assert_eq!(config.citation_api_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.summary_api_url, "http://127.0.0.1:9999");
        assert_eq!(config.polling.initial_delay, Duration::ZERO);
    }
}
