use crate::common::{platform, read_csv, test_config, CapturedLogs, BASIC_AUTH};
use linkhound::crawler::run_wiki;
use linkhound::LinkhoundError;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page(id: &str, title: &str, body: &str) -> Value {
    json!({
        "id": id,
        "type": "page",
        "title": title,
        "version": {"number": 3, "when": "2024-05-02T08:30:00.000Z"},
        "body": {"storage": {"value": body, "representation": "storage"}}
    })
}

async fn mount_spaces(mock_server: &MockServer, spaces: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/api/space"))
        .and(query_param("limit", "100"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": spaces,
            "_links": {}
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_hardcoded_and_smart_links() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_spaces(&mock_server, json!([{"key": "ENG", "name": "Engineering"}])).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .and(query_param("spaceKey", "ENG"))
        .and(query_param("type", "page"))
        .and(query_param("expand", "body.storage,version"))
        .and(query_param("status", "current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                page("101", "Release Plan", "<p>Timeline: https://drive.google.com/file/d/123/view</p>"),
                page(
                    "102",
                    "Design Review",
                    r#"<p><ac:structured-macro ac:name="inline-card" ac:schema-version="1" data-card-url="https://docs.google.com/document/d/abc"></ac:structured-macro></p>"#
                )
            ],
            "_links": {}
        })))
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.wiki = platform(&mock_server.uri());

    let stats = run_wiki(&config).await.unwrap();

    assert_eq!(stats.containers, 1);
    assert_eq!(stats.items, 2);
    assert_eq!(stats.failed_items, 0);
    assert_eq!(stats.matches_by_kind.get("Hardcoded"), Some(&1));
    assert_eq!(stats.matches_by_kind.get("Smart Link"), Some(&1));

    let spaces = read_csv(&output.path().join("spaces_list.csv"));
    assert_eq!(
        spaces,
        vec![
            vec!["Space Key", "Space Name"],
            vec!["ENG", "Engineering"],
        ]
    );

    let base = mock_server.uri();
    let links = read_csv(&output.path().join("confluence_links.csv"));
    assert_eq!(
        links,
        vec![
            vec!["Site", "Page", "Link", "Link Type", "Text", "Last Modified"]
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>(),
            vec![
                "ENG".to_string(),
                "Release Plan".to_string(),
                "https://drive.google.com/file/d/123/view".to_string(),
                "Hardcoded".to_string(),
                format!("{}/spaces/ENG/pages/101/Release-Plan", base),
                "2024-05-02T08:30:00.000Z".to_string(),
            ],
            vec![
                "ENG".to_string(),
                "Design Review".to_string(),
                "https://docs.google.com/document/d/abc".to_string(),
                "Smart Link".to_string(),
                format!("{}/spaces/ENG/pages/102/Design-Review", base),
                "2024-05-02T08:30:00.000Z".to_string(),
            ],
        ]
    );
}

#[tokio::test]
async fn test_follows_next_links() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_spaces(&mock_server, json!([{"key": "OPS", "name": "Operations"}])).await;

    // Page 2 is mounted first so it wins over the broader first-page mock
    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("2", "Runbook", "https://docs.google.com/spreadsheets/d/rota")],
            "_links": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .and(query_param("spaceKey", "OPS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("1", "On Call", "https://drive.google.com/drive/folders/oncall")],
            "_links": {"next": "/rest/api/content?spaceKey=OPS&limit=1&start=1"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.wiki = platform(&mock_server.uri());

    let stats = run_wiki(&config).await.unwrap();

    assert_eq!(stats.items, 2);
    let links = read_csv(&output.path().join("confluence_links.csv"));
    assert_eq!(links.len(), 3);
    assert_eq!(links[1][2], "https://drive.google.com/drive/folders/oncall");
    assert_eq!(links[2][2], "https://docs.google.com/spreadsheets/d/rota");
}

#[tokio::test]
async fn test_page_failure_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_spaces(&mock_server, json!([{"key": "OPS", "name": "Operations"}])).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .and(query_param("spaceKey", "OPS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("1", "On Call", "https://drive.google.com/drive/folders/oncall")],
            "_links": {"next": "/rest/api/content?spaceKey=OPS&start=1"}
        })))
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.wiki = platform(&mock_server.uri());

    let stats = run_wiki(&config).await.unwrap();

    assert_eq!(stats.items, 1);
    let links = read_csv(&output.path().join("confluence_links.csv"));
    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn test_no_matches_writes_no_link_report() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_spaces(&mock_server, json!([{"key": "HR", "name": "People"}])).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("9", "Holidays", "<p>See https://example.com/calendar</p>")],
            "_links": {}
        })))
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.wiki = platform(&mock_server.uri());

    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let stats = run_wiki(&config).await.unwrap();

    assert_eq!(stats.total_matches(), 0);
    let logged = logs.contents();
    assert!(logged.contains("WARN"), "no warning in:\n{}", logged);
    assert!(logged.contains("No data to save for confluence_links.csv"));
    assert_eq!(stats.reports.len(), 1);
    assert!(output.path().join("spaces_list.csv").exists());
    assert!(!output.path().join("confluence_links.csv").exists());
}

#[tokio::test]
async fn test_malformed_page_produces_error_row() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_spaces(&mock_server, json!([{"key": "ENG", "name": "Engineering"}])).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "5", "title": "Draft"},
                page("6", "Spec", "https://docs.google.com/document/d/spec")
            ],
            "_links": {}
        })))
        .mount(&mock_server)
        .await;

    let mut config = test_config(output.path());
    config.wiki = platform(&mock_server.uri());

    let stats = run_wiki(&config).await.unwrap();

    assert_eq!(stats.failed_items, 1);
    let links = read_csv(&output.path().join("confluence_links.csv"));
    assert_eq!(links.len(), 3);
    assert_eq!(links[1][0..4], ["ENG", "Draft", "ERROR", "N/A"]);
    assert!(links[1][4].starts_with("Malformed page"));
    assert_eq!(links[1][5], "N/A");
    assert_eq!(links[2][3], "Hardcoded");
}

#[tokio::test]
async fn test_missing_credentials_abort_before_requests() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut config = test_config(output.path());
    config.wiki.base_url = Some(mock_server.uri());

    let err = run_wiki(&config).await.unwrap_err();

    match err {
        LinkhoundError::Config(e) => assert_eq!(
            e.to_string(),
            "Missing required environment variables: CONFLUENCE_USERNAME, CONFLUENCE_API_TOKEN"
        ),
        other => panic!("expected config error, got {:?}", other),
    }
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
