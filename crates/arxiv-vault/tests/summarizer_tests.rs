//! Summarization state machine tests against a mocked service.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arxiv_vault::client::SummaryClient;
use arxiv_vault::config::Config;
use arxiv_vault::error::AssistantError;
use arxiv_vault::models::SummaryOrigin;
use arxiv_vault::summarizer::Summarizer;

const PAPER: &str = "https://arxiv.org/abs/2301.00001";

fn summarizer(server: &MockServer) -> Summarizer {
    let config = Config::for_testing(&server.uri());
    Summarizer::new(SummaryClient::new(&config).unwrap(), config.polling)
}

/// `{result: "<json>"}` as the service sends it.
fn envelope(inner: &serde_json::Value) -> serde_json::Value {
    json!({ "result": inner.to_string() })
}

async fn mount_check_miss(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

async fn mount_submit_accepted(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/service"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"request_id": "job-1"})))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Precheck
// =============================================================================

#[tokio::test]
async fn test_precheck_hit_skips_submission() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_partial_json(json!({
            "url": PAPER,
            "target_language": "English",
            "status": "COMPLETED"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(&json!({"summary": "Cached text"}))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST")).and(path("/service")).respond_with(ResponseTemplate::new(202)).expect(0).mount(&server).await;
    Mock::given(method("POST")).and(path("/status")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let result = summarizer(&server).summarize(PAPER, "English", false).await.unwrap();

    assert_eq!(result.origin, SummaryOrigin::Cache);
    assert_eq!(result.summary_text(), "Cached text");
}

#[tokio::test]
async fn test_empty_precheck_result_is_a_miss() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&json!({}))))
        .mount(&server)
        .await;
    mount_submit_accepted(&server).await;
    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "result": json!({"summary": "Fresh"}).to_string()
        })))
        .mount(&server)
        .await;

    let result = summarizer(&server).summarize(PAPER, "English", false).await.unwrap();
    assert_eq!(result.origin, SummaryOrigin::Job);
    assert_eq!(result.summary_text(), "Fresh");
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_sends_translation_request() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;

    Mock::given(method("POST"))
        .and(path("/service"))
        .and(body_partial_json(json!({
            "url": PAPER,
            "api_key": "test-key",
            "translate": true,
            "target_language": "German"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"request_id": "job-de"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/status"))
        .and(body_partial_json(json!({"requestId": "job-de"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "result": json!({"summary": "Zusammenfassung"}).to_string()
        })))
        .mount(&server)
        .await;

    let result = summarizer(&server).summarize(PAPER, "German", true).await.unwrap();
    assert_eq!(result.summary_text(), "Zusammenfassung");
}

#[tokio::test]
async fn test_non_accepted_submit_fails_without_polling() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;

    Mock::given(method("POST"))
        .and(path("/service"))
        .respond_with(ResponseTemplate::new(200).set_body_string("quota exceeded"))
        .mount(&server)
        .await;
    Mock::given(method("POST")).and(path("/status")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let err = summarizer(&server).summarize(PAPER, "English", false).await.unwrap_err();

    match err {
        AssistantError::Submission { status, message } => {
            assert_eq!(status, 200);
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("expected submission error, got {other:?}"),
    }
}

// =============================================================================
// Polling
// =============================================================================

#[tokio::test]
async fn test_pending_then_completed() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    // wiremock tries mocks in mount order; this one retires after two matches.
    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "PROCESSING"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "result": json!({"summary": "## Key points\n- one\n- \"two\""}).to_string()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = summarizer(&server).summarize(PAPER, "English", false).await.unwrap();

    assert_eq!(result.origin, SummaryOrigin::Job);
    assert_eq!(result.summary_text(), "## Key points\n- one\n- \"two\"");
}

#[tokio::test]
async fn test_unknown_status_keeps_polling() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "QUEUED_SOMEWHERE"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "result": {"summary": "Object result"}
        })))
        .mount(&server)
        .await;

    let result = summarizer(&server).summarize(PAPER, "English", false).await.unwrap();
    assert_eq!(result.summary_text(), "Object result");
}

#[tokio::test]
async fn test_job_error_is_poll_error() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ERROR",
            "error": "PDF could not be downloaded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(PAPER, "English", false).await.unwrap_err();
    match err {
        AssistantError::Poll { message } => assert_eq!(message, "PDF could not be downloaded"),
        other => panic!("expected poll error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_http_error_stops_polling() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(PAPER, "English", false).await.unwrap_err();
    assert!(matches!(err, AssistantError::PollTransport { status: 500 }));
}

#[tokio::test]
async fn test_never_resolving_job_times_out_after_budget() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    // Config::for_testing allows five status requests.
    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "PENDING"})))
        .expect(5)
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(PAPER, "English", false).await.unwrap_err();
    assert!(matches!(err, AssistantError::Timeout { attempts: 5 }));
}

#[tokio::test]
async fn test_completed_without_result_is_poll_error() {
    let server = MockServer::start().await;
    mount_check_miss(&server).await;
    mount_submit_accepted(&server).await;

    Mock::given(method("POST"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "COMPLETED"})))
        .mount(&server)
        .await;

    let err = summarizer(&server).summarize(PAPER, "English", false).await.unwrap_err();
    assert!(matches!(err, AssistantError::Poll { .. }));
}
