//! HTTP client behavior against a mock advisory backend

use serde_json::json;
use vigil::infrastructure::api::{AdvisorySource, ApiEndpoint, ApiError, HttpAdvisorySource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_backend(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/advisories"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_parses_advisory_array() {
    let body = json!([
        {
            "title": "OpenSSL heap overflow",
            "source": "NVD",
            "description": "Remote code execution",
            "severity": "CVSS 9.8",
            "published": "2026-08-01T00:00:00Z",
            "iocs": ["203.0.113.10"]
        },
        { "source": "CISA KEV" }
    ]);
    let server = mock_backend(ResponseTemplate::new(200).set_body_json(body)).await;

    let source =
        HttpAdvisorySource::new(ApiEndpoint::new(&server.uri())).expect("client");
    let advisories = source.fetch_advisories().await.expect("fetch");

    assert_eq!(advisories.len(), 2);
    assert_eq!(advisories[0].source, "NVD");
    assert_eq!(advisories[0].iocs, vec!["203.0.113.10"]);

    // Sparse records are normalized like the backend normalizes them.
    assert_eq!(advisories[1].title, "No title");
    assert_eq!(advisories[1].severity, "Unknown");
    assert!(advisories[1].iocs.is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let server =
        mock_backend(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let source =
        HttpAdvisorySource::new(ApiEndpoint::new(&server.uri())).expect("client");
    let err = source.fetch_advisories().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = mock_backend(ResponseTemplate::new(500)).await;

    let source =
        HttpAdvisorySource::new(ApiEndpoint::new(&server.uri())).expect("client");
    let err = source.fetch_advisories().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Nothing listens on this port.
    let source = HttpAdvisorySource::new(ApiEndpoint::new("http://127.0.0.1:9"))
        .expect("client");
    let err = source.fetch_advisories().await.expect_err("should fail");
    assert!(matches!(err, ApiError::Network(_)));
}
