// Integration tests for `MonitorClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netatlas_api::{Error, MonitorClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MonitorClient) {
    let server = MockServer::start().await;
    let client = MonitorClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_status_map() {
    let (server, client) = setup().await;

    let body = json!({
        "10.0.0.2": { "online": "false", "location": "PGCIL", "name": "Switch B" },
        "10.0.0.1": { "online": "true", "location": "PGCIL", "name": "Switch A", "last_seen": "1717430400" },
    });

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();

    assert_eq!(status.len(), 2);
    // BTreeMap iteration is ip-lexical regardless of response order.
    let ips: Vec<&str> = status.keys().map(String::as_str).collect();
    assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2"]);

    let first = &status["10.0.0.1"];
    assert_eq!(first.online, "true");
    assert_eq!(first.location.as_deref(), Some("PGCIL"));
    assert_eq!(first.last_seen.as_deref(), Some("1717430400"));
}

#[tokio::test]
async fn test_status_empty_map() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert!(status.is_empty());
}

#[tokio::test]
async fn test_add_device_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .and(query_param("ip", "192.168.1.50"))
        .and(query_param("location", "IT Dept"))
        .and(query_param("name", "Core Router"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_device("192.168.1.50", "IT Dept", "Core Router")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_device() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/delete"))
        .and(query_param("ip", "192.168.1.50"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("192.168.1.50").await.unwrap();
}

#[tokio::test]
async fn test_logs() {
    let (server, client) = setup().await;

    let body = json!({ "logs": ["ping 10.0.0.1 ok", "ping 10.0.0.2 timeout"] });

    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let logs = client.logs().await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1], "ping 10.0.0.2 timeout");
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_backend_json_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/add"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "IP address is required" })),
        )
        .mount(&server)
        .await;

    let err = client.add_device("", "", "").await.unwrap_err();
    match err {
        Error::Backend { message, status } => {
            assert_eq!(status, 400);
            assert_eq!(message, "IP address is required");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backend_plain_text_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/delete"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = client.delete_device("10.0.0.1").await.unwrap_err();
    match err {
        Error::Backend { message, status } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal failure");
            assert!(err_is_transient(status));
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
}

fn err_is_transient(status: u16) -> bool {
    Error::Backend {
        message: String::new(),
        status,
    }
    .is_transient()
}

#[tokio::test]
async fn test_malformed_status_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    // Port 1 is never listening.
    let client = MonitorClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let err = client.status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transient());
}
