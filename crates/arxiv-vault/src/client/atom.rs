//! arXiv Atom feed parsing.

use std::sync::LazyLock;

use chrono::DateTime;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "arxiv:doi", alias = "doi")]
    doi: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(rename = "category", default)]
    categories: Vec<AtomCategory>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomCategory {
    #[serde(rename = "@term")]
    term: Option<String>,
}

/// One cleaned feed entry. Missing fields stay `None`; placeholders are the
/// caller's decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArxivEntry {
    /// Entry id (`http://arxiv.org/abs/<id>v<n>`).
    pub id: Option<String>,

    /// Title, whitespace collapsed.
    pub title: Option<String>,

    /// Abstract page link.
    pub link: Option<String>,

    /// Publication date as `YYYY-MM-DD`, or the raw value if unparseable.
    pub published: Option<String>,

    /// Author names in feed order.
    pub authors: Vec<String>,

    /// Abstract with paragraphs separated by blank lines.
    pub summary: Option<String>,

    /// Subject categories.
    pub categories: Vec<String>,

    /// DOI.
    pub doi: Option<String>,
}

/// Parse an arXiv API response into its entries.
///
/// The API reports lookup failures as a pseudo-entry whose id points at
/// `/api/errors`; those are turned into [`ClientError::Malformed`].
pub fn parse_feed(xml: &str) -> ClientResult<Vec<ArxivEntry>> {
    let feed: AtomFeed = from_str(xml)?;

    feed.entries
        .into_iter()
        .map(|entry| {
            if entry.id.as_deref().is_some_and(|id| id.contains("/api/errors")) {
                let message = entry.summary.as_deref().map(clean_text).unwrap_or_default();
                return Err(ClientError::malformed(format!("arXiv API error: {message}")));
            }
            Ok(parse_entry(entry))
        })
        .collect()
}

fn parse_entry(entry: AtomEntry) -> ArxivEntry {
    let link = entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .and_then(|link| link.href.clone())
        .or_else(|| entry.id.clone())
        .map(|url| url.trim().replacen("http://", "https://", 1));

    ArxivEntry {
        id: clean_optional(entry.id),
        title: clean_optional(entry.title),
        link,
        published: entry.published.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(format_date),
        authors: entry.authors.into_iter().filter_map(|a| clean_optional(a.name)).collect(),
        summary: entry.summary.as_deref().map(clean_paragraphs).filter(|s| !s.is_empty()),
        categories: entry.categories.into_iter().filter_map(|c| clean_optional(c.term)).collect(),
        doi: clean_optional(entry.doi),
    }
}

fn format_date(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| clean_text(&v)).filter(|v| !v.is_empty())
}

/// Collapse whitespace inside paragraphs, keep blank-line breaks between them.
fn clean_paragraphs(input: &str) -> String {
    PARAGRAPH_BREAK
        .split(input.trim())
        .map(clean_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
