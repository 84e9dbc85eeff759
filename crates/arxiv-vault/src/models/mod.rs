//! Data models for registry responses and assistant results.
//!
//! Registry models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match API naming.

mod paper;
mod search;
mod summary;

pub use paper::{
    CitationEntry, CitationGraph, CitationInfo, EntryAuthor, InfluentialPaper, NO_ABSTRACT,
    PaperMetadata, UNKNOWN_AUTHORS, UNKNOWN_DATE, UNKNOWN_TITLE,
};
pub use search::{ExternalIds, SearchAuthor, SearchPaper, SearchResult};
pub use summary::{
    CheckEnvelope, JobPhase, JobStatus, StatusResponse, SubmitResponse, SummarizationJob,
    SummaryOrigin, SummaryResult, unescape_once,
};
