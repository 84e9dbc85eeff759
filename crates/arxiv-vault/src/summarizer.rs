//! Summarization job state machine.
//!
//! ```text
//! PRECHECK ──hit──▶ CACHED_HIT
//!    │miss
//!    ▼
//!  SUBMIT ──!202──▶ FAILED
//!    │202
//!    ▼
//! ACCEPTED ──initial delay──▶ POLLING ──▶ COMPLETED | ERROR | TIMEOUT
//! ```
//!
//! The service nests its JSON result inside a JSON string, so every result goes
//! through [`decode_envelope`] and then [`decode_result`].

use serde_json::Value;

use crate::backoff::Backoff;
use crate::client::SummaryClient;
use crate::config::{PollingConfig, polling};
use crate::error::{AssistantError, AssistantResult};
use crate::models::{
    CheckEnvelope, JobPhase, JobStatus, StatusResponse, SubmitResponse, SummarizationJob,
    SummaryOrigin, SummaryResult,
};

/// Drives one summarize operation from precheck to a terminal phase.
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: SummaryClient,
    polling: PollingConfig,
}

impl Summarizer {
    /// Create a summarizer with the given timing.
    #[must_use]
    pub fn new(client: SummaryClient, polling: PollingConfig) -> Self {
        Self { client, polling }
    }

    /// Summarize the paper at `url` (already normalized) in `target_language`.
    ///
    /// # Errors
    ///
    /// `Submission` when the service refuses the job, `Poll` when the job
    /// reports an error, `PollTransport` on a non-200 status response,
    /// `Timeout` when the attempt budget runs out, `Upstream` on transport
    /// failure during submission or polling.
    pub async fn summarize(
        &self,
        url: &str,
        target_language: &str,
        translate: bool,
    ) -> AssistantResult<SummaryResult> {
        let mut job = SummarizationJob::new(url, target_language);

        if let Some(cached) = self.precheck(&job).await {
            job.transition(JobPhase::CachedHit);
            return Ok(SummaryResult::new(cached, url, SummaryOrigin::Cache));
        }

        job.transition(JobPhase::Submit);
        let request_id = match self.submit(&job, translate).await {
            Ok(id) => id,
            Err(err) => {
                job.transition(JobPhase::Failed);
                return Err(err);
            }
        };
        job.request_id = Some(request_id);
        job.transition(JobPhase::Accepted);

        tokio::time::sleep(self.polling.initial_delay).await;

        job.transition(JobPhase::Polling);
        match self.poll(&mut job).await {
            Ok(result) => {
                job.transition(JobPhase::Completed);
                Ok(SummaryResult::new(result, url, SummaryOrigin::Job))
            }
            Err(err) => {
                let phase = match err {
                    AssistantError::Timeout { .. } => JobPhase::Timeout,
                    _ => JobPhase::Error,
                };
                job.transition(phase);
                Err(err)
            }
        }
    }

    /// Look for an existing result. Every failure is a miss.
    async fn precheck(&self, job: &SummarizationJob) -> Option<Value> {
        let response = match self.client.check(&job.source_url, &job.target_language).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Precheck failed, submitting a new job");
                return None;
            }
        };

        if !response.is_ok() || response.body.trim().is_empty() {
            tracing::debug!(status = response.status, "Precheck miss");
            return None;
        }

        let nested = decode_envelope(&response.body)?;
        match decode_result(&nested) {
            Ok(value) if !is_empty_result(&value) => Some(value),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Precheck result is not valid JSON, treating as miss");
                None
            }
        }
    }

    /// Submit the job and return its request id.
    async fn submit(&self, job: &SummarizationJob, translate: bool) -> AssistantResult<String> {
        let response =
            self.client.submit(&job.source_url, &job.target_language, translate).await?;

        if response.status != polling::SUBMIT_ACCEPTED {
            return Err(AssistantError::submission(response.status, response.body));
        }

        let accepted: SubmitResponse = serde_json::from_str(&response.body).map_err(|e| {
            AssistantError::submission(response.status, format!("malformed response: {e}"))
        })?;

        tracing::info!(request_id = %accepted.request_id, "Summarization job accepted");
        Ok(accepted.request_id)
    }

    /// Poll until the job resolves or the attempt budget is spent.
    async fn poll(&self, job: &mut SummarizationJob) -> AssistantResult<Value> {
        let request_id = job.request_id.clone().unwrap_or_default();
        let mut backoff = Backoff::new(self.polling.initial_interval, self.polling.max_interval);

        for attempt in 1..=self.polling.max_attempts {
            job.attempt_count = attempt;

            let response = self.client.status(&request_id).await?;
            if !response.is_ok() {
                return Err(AssistantError::PollTransport { status: response.status });
            }

            let status: StatusResponse = serde_json::from_str(&response.body)
                .map_err(|e| AssistantError::poll(format!("malformed status response: {e}")))?;

            match status.status {
                JobStatus::Completed => return completed_result(status),
                JobStatus::Error => {
                    let message = status.error.unwrap_or_else(|| "unknown error".to_string());
                    return Err(AssistantError::poll(message));
                }
                other => {
                    tracing::debug!(attempt, status = ?other, "Summarization still running");
                }
            }

            if attempt < self.polling.max_attempts {
                let interval = backoff.next_interval();
                job.current_interval = interval;
                tokio::time::sleep(interval).await;
            }
        }

        Err(AssistantError::Timeout { attempts: self.polling.max_attempts })
    }
}

fn completed_result(status: StatusResponse) -> AssistantResult<Value> {
    match status.result {
        Some(Value::String(nested)) => decode_result(&nested)
            .map_err(|e| AssistantError::poll(format!("malformed result: {e}"))),
        Some(Value::Null) | None => Err(AssistantError::poll("job completed without a result")),
        Some(value) => Ok(value),
    }
}

/// First decode: pull the JSON-encoded result string out of the envelope.
#[must_use]
pub fn decode_envelope(body: &str) -> Option<String> {
    let envelope: CheckEnvelope = serde_json::from_str(body).ok()?;
    envelope.result.filter(|r| !r.trim().is_empty())
}

/// Second decode: parse the JSON document nested in the envelope string.
///
/// # Errors
///
/// Returns error when the nested string is not JSON.
pub fn decode_result(nested: &str) -> serde_json::Result<Value> {
    serde_json::from_str(nested)
}

fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
