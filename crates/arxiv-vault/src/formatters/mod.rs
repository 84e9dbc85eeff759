//! Output formatters.
//!
//! Markdown bodies for vault documents and the CLI, structured field maps for
//! front matter, and document name sanitizing.

mod json;
mod markdown;

use std::sync::LazyLock;

use regex::Regex;

pub use json::{compact_search_paper, field_map, influential_field_map};
pub use markdown::{
    AI_DISCLAIMER, InfluentialEntry, Relation, format_influential_document,
    format_metadata_document, format_search_markdown, format_summary_document,
};

/// Longest document name produced by [`sanitize_filename`], in characters.
pub const MAX_FILENAME_CHARS: usize = 200;

/// Name used when a title sanitizes to nothing.
pub const UNTITLED: &str = "Untitled";

static FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|#^\[\]]"#).expect("valid regex"));

/// Turn a paper title into a document name.
///
/// Characters the vault cannot hold in a name become `_`; the result is
/// trimmed and capped at [`MAX_FILENAME_CHARS`].
#[must_use]
pub fn sanitize_filename(title: &str) -> String {
    let replaced = FORBIDDEN.replace_all(title, "_");
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let capped: String = collapsed.chars().take(MAX_FILENAME_CHARS).collect();
    let trimmed = capped.trim();

    if trimmed.is_empty() { UNTITLED.to_string() } else { trimmed.to_string() }
}
