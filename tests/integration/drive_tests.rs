use crate::common::test_config;
use linkhound::crawler::run_drive;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_statistics_across_pages() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{
                "id": "c",
                "name": "Roadmap",
                "mimeType": "application/vnd.google-apps.document",
                "modifiedTime": "2024-09-01T12:00:00.000Z",
                "shared": true
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", "'owner@acme.test' in owners and trashed=false"))
        .and(query_param("spaces", "drive"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "page-2",
            "files": [
                {
                    "id": "a",
                    "name": "invoice.pdf",
                    "mimeType": "application/pdf",
                    "modifiedTime": "2024-02-10T09:00:00.000Z",
                    "size": "1500",
                    "shared": false
                },
                {
                    "id": "b",
                    "name": "receipt.pdf",
                    "mimeType": "application/pdf",
                    "modifiedTime": "2023-12-24T18:00:00.000Z",
                    "size": "500",
                    "shared": true
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.drive.api_base_url = mock_server.uri();
    config.drive.access_token = Some("ya29.test".to_string());
    config.drive.owner_email = Some("owner@acme.test".to_string());

    let stats = run_drive(&config).await.unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.total_size, 2000);
    assert_eq!(stats.shared_files, 2);
    assert_eq!(stats.file_types.get("application/pdf"), Some(&2));
    assert_eq!(
        stats.file_types.get("application/vnd.google-apps.document"),
        Some(&1)
    );
    assert_eq!(
        stats.latest_modification.map(|t| t.to_rfc3339()),
        Some("2024-09-01T12:00:00+00:00".to_string())
    );
}

#[tokio::test]
async fn test_listing_failure_yields_empty_statistics() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient scope"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.drive.api_base_url = mock_server.uri();
    config.drive.access_token = Some("ya29.test".to_string());
    config.drive.owner_email = Some("owner@acme.test".to_string());

    let stats = run_drive(&config).await.unwrap();
    assert_eq!(stats.total_files, 0);
    assert!(stats.latest_modification.is_none());
}

#[tokio::test]
async fn test_missing_token_is_reported() {
    let output = TempDir::new().unwrap();
    let config = test_config(output.path());

    let err = run_drive(&config).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Missing required environment variables: DRIVE_ACCESS_TOKEN, DRIVE_OWNER_EMAIL"
    );
}
