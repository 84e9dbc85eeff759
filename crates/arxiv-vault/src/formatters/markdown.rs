//! Markdown output formatting.

use crate::models::{InfluentialPaper, PaperMetadata, SearchPaper, SummaryResult};

/// Footer appended to every generated summary.
pub const AI_DISCLAIMER: &str =
    "*This summary was generated by AI and may contain mistakes. Check the paper before relying on it.*";

const NONE_REPORTED: &str = "*None reported.*";

/// How an influential paper relates to the enriched note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The paper cites the enriched note's paper.
    Citation,
    /// The enriched note's paper cites it.
    Reference,
}

impl Relation {
    const fn label(self) -> &'static str {
        match self {
            Self::Citation => "Influential citation of",
            Self::Reference => "Influential reference of",
        }
    }
}

/// An influential paper together with the document it was materialized as.
///
/// `document` is `None` when influential papers are rendered as plain text.
#[derive(Debug, Clone, Copy)]
pub struct InfluentialEntry<'a> {
    /// The paper.
    pub paper: &'a InfluentialPaper,
    /// Name of its vault document, if linked.
    pub document: Option<&'a str>,
}

/// Format a summary for appending to a note.
#[must_use]
pub fn format_summary_document(result: &SummaryResult) -> String {
    format!(
        "## Summary\n\n{}\n\n**Source**: {}\n\n---\n{AI_DISCLAIMER}\n",
        result.summary_text().trim(),
        result.source_url
    )
}

/// Format paper metadata and its influential neighbours for appending to a note.
#[must_use]
pub fn format_metadata_document(
    metadata: &PaperMetadata,
    citations: &[InfluentialEntry<'_>],
    references: &[InfluentialEntry<'_>],
) -> String {
    let mut output = format!("## {}\n\n", metadata.title);

    output.push_str(&format!("**Authors**: {}\n", metadata.author_names()));
    output.push_str(&format!("**Published**: {}\n", metadata.published));
    output.push_str(&format!("**Link**: {}\n", metadata.link));
    if let Some(doi) = &metadata.doi {
        output.push_str(&format!("**DOI**: [{doi}](https://doi.org/{doi})\n"));
    }
    output.push_str(&format!(
        "**Cited by**: {} | **Citing**: {}\n\n",
        metadata.cited_by_count(),
        metadata.citing_count()
    ));

    if !metadata.categories.is_empty() {
        output.push_str(&format!("**Categories**: {}\n\n", metadata.categories.join(", ")));
    }

    output.push_str(&format!("### Abstract\n\n{}\n\n", metadata.r#abstract));

    output.push_str("### Influential citations\n\n");
    output.push_str(&format_entries(citations));
    output.push_str("\n### Influential references\n\n");
    output.push_str(&format_entries(references));

    output
}

fn format_entries(entries: &[InfluentialEntry<'_>]) -> String {
    if entries.is_empty() {
        return format!("{NONE_REPORTED}\n");
    }

    entries.iter().map(|entry| format!("{}\n", format_entry(entry))).collect()
}

fn format_entry(entry: &InfluentialEntry<'_>) -> String {
    let paper = entry.paper;
    let year = paper.year.map(|y| format!(" ({y})")).unwrap_or_default();

    match entry.document {
        Some(document) => {
            format!("- [[{document}]]{year}, {} citations", paper.citation_count)
        }
        None => {
            let mut line = format!("- **{}**{year}, {}", paper.title, paper.author_names());
            if let Some(venue) = &paper.venue {
                line.push_str(&format!(", *{venue}*"));
            }
            if let Some(url) = &paper.url {
                line.push_str(&format!(" [link]({url})"));
            }
            line
        }
    }
}

/// Format the body of a document materialized from an influential paper.
#[must_use]
pub fn format_influential_document(
    paper: &InfluentialPaper,
    source_note: &str,
    relation: Relation,
) -> String {
    let mut output = format!("## {}\n\n", paper.title);

    output.push_str(&format!("**Authors**: {}\n", paper.author_names()));

    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    if let Some(venue) = &paper.venue {
        meta.push(format!("**Venue**: {venue}"));
    }
    meta.push(format!("**Citations**: {}", paper.citation_count));
    output.push_str(&format!("{}\n", meta.join(" | ")));

    let mut links = Vec::new();
    if let Some(url) = &paper.url {
        links.push(format!("[S2]({url})"));
    }
    if let Some(arxiv) = &paper.arxiv_id {
        links.push(format!("[arXiv](https://arxiv.org/abs/{arxiv})"));
    }
    if let Some(doi) = &paper.doi {
        links.push(format!("[DOI](https://doi.org/{doi})"));
    }
    if !links.is_empty() {
        output.push_str(&format!("**Links**: {}\n", links.join(" | ")));
    }

    if !paper.intent.is_empty() {
        output.push_str(&format!("**Intent**: {}\n", paper.intent.join(", ")));
    }

    output.push_str(&format!("\n{} [[{source_note}]]\n", relation.label()));
    output
}

/// Format citation search hits for the terminal.
#[must_use]
pub fn format_search_markdown(papers: &[SearchPaper]) -> String {
    if papers.is_empty() {
        return "No papers found.".to_string();
    }

    let mut output = format!("# Papers ({} results)\n\n", papers.len());

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format!("## {}. {}\n\n", i + 1, paper.title_or_default()));
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));

        let mut meta = Vec::new();
        if let Some(year) = paper.year {
            meta.push(format!("**Year**: {year}"));
        }
        meta.push(format!("**Citations**: {}", paper.citations()));
        if let Some(venue) = paper.venue.as_deref().filter(|v| !v.is_empty()) {
            meta.push(format!("**Venue**: {venue}"));
        }
        output.push_str(&format!("{}\n\n", meta.join(" | ")));

        if let Some(arxiv) = paper.arxiv_id() {
            output.push_str(&format!("**arXiv**: https://arxiv.org/abs/{arxiv}\n\n"));
        }

        output.push_str("---\n\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{CitationInfo, SummaryOrigin};

    fn influential(title: &str, citations: u64) -> InfluentialPaper {
        InfluentialPaper {
            external_id: format!("s2-{title}"),
            title: title.to_string(),
            url: Some(format!("https://www.semanticscholar.org/paper/{title}")),
            venue: Some("NeurIPS".to_string()),
            year: Some(2020),
            authors: vec!["Grace Hopper".to_string()],
            arxiv_id: None,
            doi: None,
            citation_count: citations,
            intent: vec!["methodology".to_string()],
        }
    }

    fn metadata() -> PaperMetadata {
        PaperMetadata {
            arxiv_id: "2301.00001".to_string(),
            title: "Example Paper".to_string(),
            link: "https://arxiv.org/abs/2301.00001".to_string(),
            published: "2023-01-01".to_string(),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            r#abstract: "First paragraph.\n\nSecond paragraph.".to_string(),
            categories: vec!["cs.LG".to_string()],
            doi: None,
            citations: CitationInfo { cited_by_count: 12, citing_count: 4, ..CitationInfo::default() },
        }
    }

    #[test]
    fn test_summary_document_contains_source_and_disclaimer() {
        let result = SummaryResult::new(
            json!({"summary": r"Line one\nLine two"}),
            "https://arxiv.org/abs/2301.00001",
            SummaryOrigin::Job,
        );

        let doc = format_summary_document(&result);
        assert!(doc.contains("Line one\nLine two"));
        assert!(doc.contains("**Source**: https://arxiv.org/abs/2301.00001"));
        assert!(doc.ends_with(&format!("{AI_DISCLAIMER}\n")));
    }

    #[test]
    fn test_summary_document_falls_back_to_raw() {
        let result = SummaryResult::new(json!({"status": "odd"}), "u", SummaryOrigin::Cache);
        assert!(format_summary_document(&result).contains(r#"{"status":"odd"}"#));
    }

    #[test]
    fn test_metadata_document_links_and_bullets() {
        let linked = influential("Linked", 10);
        let plain = influential("Plain", 3);
        let citations = [InfluentialEntry { paper: &linked, document: Some("Linked") }];
        let references = [InfluentialEntry { paper: &plain, document: None }];

        let doc = format_metadata_document(&metadata(), &citations, &references);

        assert!(doc.starts_with("## Example Paper\n"));
        assert!(doc.contains("**Authors**: Ada Lovelace, Alan Turing"));
        assert!(doc.contains("**Cited by**: 12 | **Citing**: 4"));
        assert!(doc.contains("First paragraph.\n\nSecond paragraph."));
        assert!(doc.contains("- [[Linked]] (2020), 10 citations"));
        assert!(doc.contains("- **Plain** (2020), Grace Hopper, *NeurIPS*"));
    }

    #[test]
    fn test_metadata_document_empty_lists() {
        let doc = format_metadata_document(&metadata(), &[], &[]);
        assert_eq!(doc.matches(NONE_REPORTED).count(), 2);
    }

    #[test]
    fn test_influential_document_backlink() {
        let paper = influential("Cited", 1);
        let doc = format_influential_document(&paper, "Example Paper", Relation::Reference);
        assert!(doc.starts_with("## Cited\n"));
        assert!(doc.contains("**Intent**: methodology"));
        assert!(doc.contains("Influential reference of [[Example Paper]]"));
    }

    #[test]
    fn test_search_markdown_empty() {
        assert_eq!(format_search_markdown(&[]), "No papers found.");
    }
}
