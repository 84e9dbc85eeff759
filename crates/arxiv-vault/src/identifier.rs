//! arXiv identifier normalization.
//!
//! Every entry point funnels user input through [`normalize`] so that the PDF
//! link, the plain-HTTP link and the abstract page of one paper all share a
//! single canonical form `https://arxiv.org/abs/<id>`. Caches and jobs are keyed
//! by that form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AssistantError, AssistantResult};

/// Host part of the canonical abstract page.
pub const ABS_PREFIX: &str = "https://arxiv.org/abs/";

// New style `YYMM.NNNNN` or legacy `archive(.SUB)/YYMMNNN`, optional version.
const ID_PATTERN: &str = r"(?P<id>\d{4}\.\d{4,5}|[a-zA-Z][a-zA-Z\-]*(?:\.[A-Z]{2})?/\d{7})(?:v(?P<version>\d+))?";

static ABS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^https://arxiv\.org/abs/{ID_PATTERN}$")).expect("valid abs url regex")
});

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?i:arxiv:)?{ID_PATTERN}$")).expect("valid bare id regex")
});

/// Canonicalize a paper reference.
///
/// Rewrites `http:` to `https:`, the `/pdf/` path to `/abs/`, and strips any
/// trailing `.pdf`. Input that is not an arXiv URL passes through trimmed.
/// Applying it twice gives the same result as applying it once.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut url = input.trim().to_string();

    if let Some(rest) = url.strip_prefix("http://") {
        url = format!("https://{rest}");
    }

    url = url.replace("arxiv.org/pdf/", "arxiv.org/abs/");

    loop {
        let trimmed = url.trim_end();
        let stripped = trimmed.strip_suffix(".pdf").unwrap_or(trimmed);
        if stripped.len() == url.len() {
            break;
        }
        url = stripped.to_string();
    }

    url
}

/// Whether `url` is a canonical arXiv abstract page.
#[must_use]
pub fn validate(url: &str) -> bool {
    ABS_URL.is_match(url)
}

/// Normalize `input` and extract its identifier.
///
/// Accepts abstract/PDF URLs in any of their variants and bare identifiers
/// (`2301.00001`, `arXiv:2301.00001v2`).
pub fn extract_id(input: &str) -> AssistantResult<ArxivId> {
    let normalized = normalize(input);

    let captures = ABS_URL
        .captures(&normalized)
        .or_else(|| BARE_ID.captures(&normalized))
        .ok_or_else(|| {
            AssistantError::invalid_input(input, "expected an arXiv abstract or PDF link")
        })?;

    let id = captures["id"].to_string();
    let version = match captures.name("version") {
        Some(v) => Some(
            v.as_str()
                .parse()
                .map_err(|_| AssistantError::invalid_input(input, "version number out of range"))?,
        ),
        None => None,
    };

    Ok(ArxivId { id, version })
}

/// A parsed arXiv identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArxivId {
    /// Identifier without version (`2301.00001`, `hep-th/9901001`).
    pub id: String,

    /// Explicit version, when the input carried one.
    pub version: Option<u32>,
}

impl ArxivId {
    /// Parse from any accepted input form.
    pub fn parse(input: &str) -> AssistantResult<Self> {
        extract_id(input)
    }

    /// Identifier including its version suffix.
    #[must_use]
    pub fn versioned(&self) -> String {
        match self.version {
            Some(v) => format!("{}v{v}", self.id),
            None => self.id.clone(),
        }
    }

    /// Canonical abstract page.
    #[must_use]
    pub fn abs_url(&self) -> String {
        format!("{ABS_PREFIX}{}", self.versioned())
    }

    /// PDF location under `base` (e.g. `https://arxiv.org/pdf`).
    #[must_use]
    pub fn pdf_url(&self, base: &str) -> String {
        format!("{}/{}.pdf", base.trim_end_matches('/'), self.versioned())
    }

    /// Key understood by the citation registry (`arXiv:<id>`).
    #[must_use]
    pub fn compound_id(&self) -> String {
        format!("arXiv:{}", self.id)
    }

    /// Key shared by the metadata cache and summarization jobs.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.versioned()
    }

    /// File name a downloaded PDF is stored under.
    #[must_use]
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.versioned().replace('/', "_"))
    }
}

impl fmt::Display for ArxivId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.versioned())
    }
}
