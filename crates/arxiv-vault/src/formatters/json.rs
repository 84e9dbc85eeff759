//! Structured field maps and compact JSON views.

use serde_json::{Value, json};

use crate::models::{InfluentialPaper, PaperMetadata, SearchPaper};
use crate::vault::FieldMap;

/// Front matter fields for an enriched note.
#[must_use]
pub fn field_map(metadata: &PaperMetadata) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("title".into(), json!(metadata.title));
    fields.insert("link".into(), json!(metadata.link));
    fields.insert("published".into(), json!(metadata.published));
    fields.insert("authors".into(), json!(metadata.authors));
    fields.insert("cited_by".into(), json!(metadata.cited_by_count()));
    fields.insert("citing".into(), json!(metadata.citing_count()));
    fields.insert("arxiv_id".into(), json!(metadata.arxiv_id));
    fields
}

/// Front matter fields for a note materialized from an influential paper.
#[must_use]
pub fn influential_field_map(paper: &InfluentialPaper) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("title".into(), json!(paper.title));
    fields.insert("authors".into(), json!(paper.authors));
    fields.insert("citations".into(), json!(paper.citation_count));

    let optional = [
        ("link", paper.url.as_deref()),
        ("venue", paper.venue.as_deref()),
        ("arxiv_id", paper.arxiv_id.as_deref()),
        ("doi", paper.doi.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            fields.insert(key.into(), json!(value));
        }
    }
    if let Some(year) = paper.year {
        fields.insert("year".into(), json!(year));
    }
    if !paper.intent.is_empty() {
        fields.insert("intent".into(), json!(paper.intent));
    }

    fields
}

/// Compact search hit for `--json` output.
#[must_use]
pub fn compact_search_paper(paper: &SearchPaper) -> Value {
    let mut obj = json!({
        "id": paper.paper_id,
        "title": paper.title_or_default(),
        "citations": paper.citations(),
    });

    if let Some(year) = paper.year {
        obj["year"] = json!(year);
    }
    if let Some(venue) = &paper.venue {
        obj["venue"] = json!(venue);
    }
    if !paper.authors.is_empty() {
        obj["authors"] = json!(paper.author_names());
    }
    if let Some(arxiv) = paper.arxiv_id() {
        obj["arxiv"] = json!(arxiv);
    }
    if let Some(doi) = paper.doi() {
        obj["doi"] = json!(doi);
    }

    obj
}
