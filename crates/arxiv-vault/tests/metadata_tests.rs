//! Metadata fetcher tests against mocked registries.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arxiv_vault::cache::MetadataCache;
use arxiv_vault::client::{ArxivClient, CitationClient};
use arxiv_vault::config::Config;
use arxiv_vault::error::{AssistantError, ClientError};
use arxiv_vault::metadata::MetadataFetcher;
use arxiv_vault::models::{CitationInfo, UNKNOWN_AUTHORS, UNKNOWN_TITLE};

fn fetcher(server: &MockServer, cache: MetadataCache) -> MetadataFetcher {
    let config = Config::for_testing(&server.uri());
    MetadataFetcher::new(
        ArxivClient::new(&config).unwrap(),
        CitationClient::new(&config).unwrap(),
        cache,
    )
}

fn atom_feed(id: &str, title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <published>2023-01-01T10:00:00Z</published>
    <title>{title}</title>
    <summary>First   paragraph
      continues here.

      Second paragraph.</summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/{id}v1" rel="alternate" type="text/html"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#
    )
}

fn citation_entry(id: &str, influential: bool, citations: u64) -> serde_json::Value {
    json!({
        "paperId": id,
        "title": format!("Paper {id}"),
        "url": format!("https://www.semanticscholar.org/paper/{id}"),
        "venue": "ICML",
        "year": 2021,
        "authors": [{"authorId": "1", "name": "Grace Hopper"}],
        "isInfluential": influential,
        "citationCount": citations,
        "intent": ["methodology"]
    })
}

async fn mount_arxiv(server: &MockServer, id: &str, title: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("id_list", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(atom_feed(id, title)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// =============================================================================
// Fetch Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_builds_complete_record() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Example Paper", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numCitedBy": 5,
            "numCiting": 2,
            "citations": [
                citation_entry("c1", false, 1),
                citation_entry("c2", true, 20),
                citation_entry("c3", false, 3),
                citation_entry("c4", true, 40),
                citation_entry("c5", false, 5)
            ],
            "references": [citation_entry("r1", true, 100), citation_entry("r2", false, 0)]
        })))
        .mount(&server)
        .await;

    let metadata = fetcher(&server, MetadataCache::new(10))
        .fetch("https://arxiv.org/pdf/2301.00001.pdf")
        .await
        .unwrap();

    assert_eq!(metadata.title, "Example Paper");
    assert_eq!(metadata.link, "https://arxiv.org/abs/2301.00001");
    assert_eq!(metadata.published, "2023-01-01");
    assert_eq!(metadata.author_names(), "Ada Lovelace, Alan Turing");
    assert_eq!(metadata.r#abstract, "First paragraph continues here.\n\nSecond paragraph.");
    assert_eq!(metadata.cited_by_count(), 5);
    assert_eq!(metadata.citing_count(), 2);

    // Exactly the flagged entries, in registry order
    let ids: Vec<_> =
        metadata.citations.influential_citations.iter().map(|p| p.external_id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c4"]);
    assert_eq!(metadata.citations.influential_references.len(), 1);
    assert_eq!(metadata.citations.influential_references[0].author_names(), "Grace Hopper");
}

#[tokio::test]
async fn test_second_fetch_hits_cache() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Example Paper", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"numCitedBy": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let cache = MetadataCache::new(10);
    let fetcher = fetcher(&server, cache.clone());

    let first = fetcher.fetch("http://arxiv.org/abs/2301.00001").await.unwrap();
    let second = fetcher.fetch("https://arxiv.org/pdf/2301.00001").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.contains("2301.00001"));
}

#[tokio::test]
async fn test_versions_are_distinct_cache_keys() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Unversioned", 1).await;
    mount_arxiv(&server, "2301.00001v2", "Version two", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, MetadataCache::new(10));
    let plain = fetcher.fetch("2301.00001").await.unwrap();
    let versioned = fetcher.fetch("arXiv:2301.00001v2").await.unwrap();

    assert_eq!(plain.title, "Unversioned");
    assert_eq!(versioned.title, "Version two");
}

#[tokio::test]
async fn test_refresh_bypasses_cache() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Example Paper", 2).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, MetadataCache::new(10));
    let id = arxiv_vault::identifier::extract_id("2301.00001").unwrap();

    fetcher.fetch_id(&id).await.unwrap();
    fetcher.refresh(&id).await.unwrap();
}

// =============================================================================
// Degradation and Error Tests
// =============================================================================

#[tokio::test]
async fn test_citation_outage_degrades_to_empty() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Example Paper", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let metadata = fetcher(&server, MetadataCache::new(10)).fetch("2301.00001").await.unwrap();

    assert_eq!(metadata.title, "Example Paper");
    assert_eq!(metadata.citations, CitationInfo::default());
}

#[tokio::test]
async fn test_malformed_citation_json_degrades_to_empty() {
    let server = MockServer::start().await;
    mount_arxiv(&server, "2301.00001", "Example Paper", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let metadata = fetcher(&server, MetadataCache::new(10)).fetch("2301.00001").await.unwrap();
    assert!(metadata.citations.is_empty());
}

#[tokio::test]
async fn test_arxiv_failure_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let cache = MetadataCache::new(10);
    let result = fetcher(&server, cache.clone()).fetch("2301.00001").await;

    match result {
        Err(AssistantError::Upstream(err)) => assert_eq!(err.status(), Some(404)),
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert!(!cache.contains("2301.00001"));
}

#[tokio::test]
async fn test_empty_feed_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#,
        ))
        .mount(&server)
        .await;

    let result = fetcher(&server, MetadataCache::new(10)).fetch("2301.00001").await;
    assert!(matches!(result, Err(AssistantError::Upstream(ClientError::Malformed(_)))));
}

#[tokio::test]
async fn test_sparse_entry_gets_placeholders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>http://arxiv.org/abs/2301.00001v1</id></entry></feed>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/paper/arXiv:2301.00001"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let metadata = fetcher(&server, MetadataCache::new(10)).fetch("2301.00001").await.unwrap();
    assert_eq!(metadata.title, UNKNOWN_TITLE);
    assert_eq!(metadata.author_names(), UNKNOWN_AUTHORS);
    assert_eq!(metadata.link, "https://arxiv.org/abs/2301.00001");
}

#[tokio::test]
async fn test_invalid_input_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = fetcher(&server, MetadataCache::new(10)).fetch("https://example.com/paper").await;
    assert!(matches!(result, Err(AssistantError::InvalidInput { .. })));
}
