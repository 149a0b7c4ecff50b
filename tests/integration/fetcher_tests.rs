use crate::common::BASIC_AUTH;
use linkhound::crawler::{build_http_client, Credential, Fetch, Fetcher, RetryPolicy};
use linkhound::FetchError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn basic_fetcher(max_attempts: u32) -> Fetcher {
    Fetcher::new(
        build_http_client().unwrap(),
        Credential::Basic {
            username: "auditor".to_string(),
            api_token: "s3cret".to_string(),
        },
        RetryPolicy::immediate(max_attempts),
    )
}

#[tokio::test]
async fn test_sends_basic_auth_and_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/space"))
        .and(query_param("limit", "100"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/space", mock_server.uri());
    let document = basic_fetcher(3).fetch(&url, &[("limit", "100")]).await.unwrap();

    assert_eq!(document, json!({"results": []}));
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(
        build_http_client().unwrap(),
        Credential::Bearer("ya29.test".to_string()),
        RetryPolicy::immediate(1),
    );
    let url = format!("{}/files", mock_server.uri());
    assert!(fetcher.fetch(&url, &[]).await.is_ok());
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mock_server = MockServer::start().await;

    // First matching mock wins, so the 429 is served until it is used up
    Mock::given(method("GET"))
        .and(path("/rest/api/3/project"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"key": "OPS"}])))
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/3/project", mock_server.uri());
    let document = basic_fetcher(3).fetch(&url, &[]).await.unwrap();

    assert_eq!(document, json!([{"key": "OPS"}]));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_rate_limit_with_body_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/space"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "1")
                .set_body_string("{\"message\": \"Too many requests\"}"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/space"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"key": "ENG"}]})))
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/space", mock_server.uri());
    let fetcher = basic_fetcher(2);
    let document = fetcher.fetch(&url, &[]).await.unwrap();

    assert_eq!(document, json!({"results": [{"key": "ENG"}]}));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_errors_exhaust_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(4)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/content", mock_server.uri());
    let err = basic_fetcher(4).fetch(&url, &[]).await.unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/OPS-1/remotelink"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Issue does not exist"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/3/issue/OPS-1/remotelink", mock_server.uri());
    let err = basic_fetcher(5).fetch(&url, &[]).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_rate_limit_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/space", mock_server.uri());
    let err = basic_fetcher(2).fetch(&url, &[]).await.unwrap_err();

    assert!(matches!(err, FetchError::RateLimited { .. }));
}

#[tokio::test]
async fn test_invalid_json_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/rest/api/space", mock_server.uri());
    let err = basic_fetcher(3).fetch(&url, &[]).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}
