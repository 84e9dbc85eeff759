//! Paper metadata and citation graph models.

use serde::{Deserialize, Serialize};

/// Placeholder used when the registry omits a title.
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Placeholder used when the registry lists no authors.
pub const UNKNOWN_AUTHORS: &str = "Unknown authors";

/// Placeholder used when the publication date is missing.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Placeholder used when the abstract is missing.
pub const NO_ABSTRACT: &str = "No abstract available";

/// Bibliographic record of one paper, with its citation graph attached.
///
/// Built once per identifier and shared read-only; a refetch replaces the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// arXiv identifier including version, when one was requested.
    pub arxiv_id: String,

    /// Paper title.
    pub title: String,

    /// Canonical abstract page.
    pub link: String,

    /// Publication date (`YYYY-MM-DD` when parseable).
    pub published: String,

    /// Authors in registry order.
    pub authors: Vec<String>,

    /// Abstract with paragraph breaks preserved.
    pub r#abstract: String,

    /// arXiv subject categories.
    #[serde(default)]
    pub categories: Vec<String>,

    /// DOI registered with arXiv, if any.
    #[serde(default)]
    pub doi: Option<String>,

    /// Citation counts and influential neighbours.
    pub citations: CitationInfo,
}

impl PaperMetadata {
    /// Authors joined for display, or a placeholder.
    #[must_use]
    pub fn author_names(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHORS.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Number of papers citing this one.
    #[must_use]
    pub const fn cited_by_count(&self) -> u64 {
        self.citations.cited_by_count
    }

    /// Number of papers this one cites.
    #[must_use]
    pub const fn citing_count(&self) -> u64 {
        self.citations.citing_count
    }
}

/// Citation summary for one paper.
///
/// `Default` is the value substituted when the citation registry is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationInfo {
    /// Papers citing this one.
    pub cited_by_count: u64,

    /// Papers this one cites.
    pub citing_count: u64,

    /// Influential papers citing this one, in registry order.
    pub influential_citations: Vec<InfluentialPaper>,

    /// Influential papers cited by this one, in registry order.
    pub influential_references: Vec<InfluentialPaper>,
}

impl CitationInfo {
    /// Keep only the entries the registry flags as influential.
    #[must_use]
    pub fn from_graph(graph: CitationGraph) -> Self {
        Self {
            cited_by_count: graph.num_cited_by.unwrap_or(0),
            citing_count: graph.num_citing.unwrap_or(0),
            influential_citations: influential(graph.citations.unwrap_or_default()),
            influential_references: influential(graph.references.unwrap_or_default()),
        }
    }

    /// True when nothing beyond zero counts is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Influential citations, most cited first.
    #[must_use]
    pub fn ranked_citations(&self) -> Vec<InfluentialPaper> {
        ranked(&self.influential_citations)
    }

    /// Influential references, most cited first.
    #[must_use]
    pub fn ranked_references(&self) -> Vec<InfluentialPaper> {
        ranked(&self.influential_references)
    }
}

fn influential(entries: Vec<CitationEntry>) -> Vec<InfluentialPaper> {
    entries
        .into_iter()
        .filter(|entry| entry.is_influential.unwrap_or(false))
        .map(InfluentialPaper::from)
        .collect()
}

// Stable sort: equal counts keep registry order.
fn ranked(papers: &[InfluentialPaper]) -> Vec<InfluentialPaper> {
    let mut sorted = papers.to_vec();
    sorted.sort_by(|a, b| b.citation_count.cmp(&a.citation_count));
    sorted
}

/// A paper flagged influential in the citation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluentialPaper {
    /// Citation registry paper ID.
    pub external_id: String,

    /// Paper title.
    pub title: String,

    /// Registry landing page.
    pub url: Option<String>,

    /// Publication venue.
    pub venue: Option<String>,

    /// Publication year.
    pub year: Option<i32>,

    /// Author names.
    pub authors: Vec<String>,

    /// arXiv identifier, if the paper is on arXiv.
    pub arxiv_id: Option<String>,

    /// DOI, if registered.
    pub doi: Option<String>,

    /// Number of citations this paper has received.
    pub citation_count: u64,

    /// Citation intents (`background`, `methodology`, `result`).
    pub intent: Vec<String>,
}

impl InfluentialPaper {
    /// Author names joined for display.
    #[must_use]
    pub fn author_names(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHORS.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Key that identifies this paper across both influential lists.
    #[must_use]
    pub fn identity(&self) -> &str {
        if self.external_id.is_empty() { &self.title } else { &self.external_id }
    }
}

impl From<CitationEntry> for InfluentialPaper {
    fn from(entry: CitationEntry) -> Self {
        Self {
            external_id: entry.paper_id.unwrap_or_default(),
            title: non_empty(entry.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            url: non_empty(entry.url),
            venue: non_empty(entry.venue),
            year: entry.year,
            authors: entry
                .authors
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| non_empty(a.name))
                .collect(),
            arxiv_id: non_empty(entry.arxiv_id),
            doi: non_empty(entry.doi),
            citation_count: entry.citation_count.unwrap_or(0),
            intent: entry.intent.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Citation registry response for `GET /paper/arXiv:<id>`.
///
/// Every field is optional: the registry returns `null` freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationGraph {
    /// Papers citing this one.
    #[serde(default)]
    pub num_cited_by: Option<u64>,

    /// Papers this one cites.
    #[serde(default)]
    pub num_citing: Option<u64>,

    /// Citing papers.
    #[serde(default)]
    pub citations: Option<Vec<CitationEntry>>,

    /// Cited papers.
    #[serde(default)]
    pub references: Option<Vec<CitationEntry>>,
}

/// One neighbour in the citation graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationEntry {
    /// Registry paper ID.
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Registry landing page.
    #[serde(default)]
    pub url: Option<String>,

    /// Publication venue.
    #[serde(default)]
    pub venue: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Authors.
    #[serde(default)]
    pub authors: Option<Vec<EntryAuthor>>,

    /// arXiv identifier.
    #[serde(default)]
    pub arxiv_id: Option<String>,

    /// DOI.
    #[serde(default)]
    pub doi: Option<String>,

    /// Registry influence flag.
    #[serde(default)]
    pub is_influential: Option<bool>,

    /// Citation count.
    #[serde(default)]
    pub citation_count: Option<u64>,

    /// Citation intents.
    #[serde(default)]
    pub intent: Option<Vec<String>>,
}

/// Author reference inside a citation entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAuthor {
    /// Registry author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}
