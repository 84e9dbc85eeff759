//! Summarization service wire types and job state.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned by `POST /check`.
///
/// `result` is itself a JSON document encoded as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckEnvelope {
    /// JSON-encoded result document.
    #[serde(default)]
    pub result: Option<String>,
}

/// Body of an accepted `POST /service`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Identifier to poll with.
    pub request_id: String,
}

/// Body of `POST /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Job status.
    pub status: JobStatus,

    /// Result, usually a JSON-encoded string.
    #[serde(default)]
    pub result: Option<Value>,

    /// Source URL echoed back.
    #[serde(default)]
    pub url: Option<String>,

    /// Error message when `status` is `ERROR`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Remote job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Queued.
    Pending,
    /// Running.
    Processing,
    /// Finished with a result.
    Completed,
    /// Finished with an error.
    Error,
    /// Anything else the service may report.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Whether polling stops on this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Phases of one summarize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Asking the service for an existing result.
    Precheck,
    /// Existing result found (terminal).
    CachedHit,
    /// Posting a new job.
    Submit,
    /// Job accepted, waiting before the first poll.
    Accepted,
    /// Polling the status endpoint.
    Polling,
    /// Result received (terminal).
    Completed,
    /// Service refused the job (terminal).
    Failed,
    /// Job reported an error or the status endpoint failed (terminal).
    Error,
    /// Attempt budget exhausted (terminal).
    Timeout,
}

impl JobPhase {
    /// Whether the machine stops in this phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CachedHit | Self::Completed | Self::Failed | Self::Error | Self::Timeout
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Precheck => "PRECHECK",
            Self::CachedHit => "CACHED_HIT",
            Self::Submit => "SUBMIT",
            Self::Accepted => "ACCEPTED",
            Self::Polling => "POLLING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
            Self::Timeout => "TIMEOUT",
        };
        f.write_str(name)
    }
}

/// One in-flight summarize operation. Never persisted.
#[derive(Debug, Clone)]
pub struct SummarizationJob {
    /// Normalized paper URL.
    pub source_url: String,

    /// Requested summary language.
    pub target_language: String,

    /// Identifier assigned by the service on submission.
    pub request_id: Option<String>,

    /// Status requests issued so far.
    pub attempt_count: u32,

    /// Interval of the most recent sleep.
    pub current_interval: Duration,

    /// Current phase.
    pub phase: JobPhase,
}

impl SummarizationJob {
    /// New job in the precheck phase.
    #[must_use]
    pub fn new(source_url: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            target_language: target_language.into(),
            request_id: None,
            attempt_count: 0,
            current_interval: Duration::ZERO,
            phase: JobPhase::Precheck,
        }
    }

    /// Move to `next`, logging the transition.
    pub fn transition(&mut self, next: JobPhase) {
        tracing::info!(
            url = %self.source_url,
            from = %self.phase,
            to = %next,
            attempts = self.attempt_count,
            "Summarization job transition"
        );
        self.phase = next;
    }
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryOrigin {
    /// Service-side result cache (precheck hit).
    Cache,
    /// Freshly completed job.
    Job,
}

/// A completed summary, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    /// Decoded result document.
    pub raw_result: Value,

    /// Normalized paper URL.
    pub source_url: String,

    /// Precheck hit or fresh job.
    pub origin: SummaryOrigin,
}

impl SummaryResult {
    /// Create a new result.
    #[must_use]
    pub fn new(raw_result: Value, source_url: impl Into<String>, origin: SummaryOrigin) -> Self {
        Self { raw_result, source_url: source_url.into(), origin }
    }

    /// Summary text with one level of JSON escaping removed.
    ///
    /// Falls back to the whole result document, stringified, when the summary
    /// is missing or cannot be unescaped.
    #[must_use]
    pub fn summary_text(&self) -> String {
        let summary = match &self.raw_result {
            Value::String(text) => Some(text.as_str()),
            other => other.get("summary").and_then(Value::as_str),
        };

        summary
            .and_then(unescape_once)
            .unwrap_or_else(|| self.raw_result.to_string())
    }
}

/// Undo one level of JSON string escaping (`\n`, `\"`, `\\`, `\uXXXX`).
///
/// Raw newlines and bare quotes already in the text are kept as they are.
/// Returns `None` only for a malformed escape sequence.
#[must_use]
pub fn unescape_once(text: &str) -> Option<String> {
    if !text.contains('\\') {
        return Some(text.to_string());
    }

    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    let mut escaping = false;
    for c in text.chars() {
        if escaping {
            literal.push(c);
            escaping = false;
            continue;
        }
        match c {
            '\\' => {
                literal.push(c);
                escaping = true;
            }
            '"' => literal.push_str("\\\""),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => literal.push(c),
        }
    }
    literal.push('"');

    serde_json::from_str(&literal).ok()
}
