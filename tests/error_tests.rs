//! Integration tests for error classification and authentication headers.

use std::time::Duration;

use serde_json::json;
use sonarqube_api::{AccessToken, ApiError, ErrorKind, ServerUrl, SonarQube, SonarQubeConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(server: &MockServer, token: Option<&str>) -> SonarQube {
    let mut builder = SonarQubeConfig::builder().server_url(ServerUrl::new(server.uri()).unwrap());
    if let Some(token) = token {
        builder = builder.token(AccessToken::new(token));
    }
    SonarQube::new(&builder.build().unwrap()).unwrap()
}

/// Mounts `api/projects/delete` answering with `response`.
async fn mount_delete(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/projects/delete"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn errors_body(msg: &str) -> serde_json::Value {
    json!({"errors": [{"msg": msg}]})
}

// ============================================================================
// Status classification
// ============================================================================

#[tokio::test]
async fn test_forbidden_is_authorization_error() {
    let server = MockServer::start().await;
    mount_delete(
        &server,
        ResponseTemplate::new(403).set_body_json(errors_body("Insufficient privileges")),
    )
    .await;

    let sonar = create_client(&server, Some("squ_test"));
    let error = sonar.projects().delete("my-app").execute().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Authorization);
    assert_eq!(error.status(), Some(403));
    assert_eq!(error.messages(), ["Insufficient privileges"]);
    assert!(error.to_string().contains("Insufficient privileges"));
}

#[tokio::test]
async fn test_status_codes_map_to_kinds() {
    let cases = [
        (400, ErrorKind::Validation),
        (401, ErrorKind::Authentication),
        (404, ErrorKind::NotFound),
        (409, ErrorKind::Api),
        (500, ErrorKind::Api),
        (503, ErrorKind::Api),
    ];

    for (status, kind) in cases {
        let server = MockServer::start().await;
        mount_delete(
            &server,
            ResponseTemplate::new(status).set_body_json(errors_body("failure")),
        )
        .await;

        let sonar = create_client(&server, Some("squ_test"));
        let error = sonar.projects().delete("my-app").execute().await.unwrap_err();
        assert_eq!(error.kind(), kind, "status {status}");
        assert_eq!(error.status(), Some(status));
        assert!(!error.is_client_side());
    }
}

#[tokio::test]
async fn test_server_validation_error_keeps_all_messages() {
    let server = MockServer::start().await;
    mount_delete(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"msg": "first problem"}, {"msg": "second problem"}]
        })),
    )
    .await;

    let sonar = create_client(&server, Some("squ_test"));
    let error = sonar.projects().delete("my-app").execute().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.messages(), ["first problem", "second problem"]);
}

#[tokio::test]
async fn test_rate_limit_exposes_retry_after() {
    let server = MockServer::start().await;
    mount_delete(
        &server,
        ResponseTemplate::new(429)
            .insert_header("Retry-After", "30")
            .set_body_json(errors_body("Too many requests")),
    )
    .await;

    let sonar = create_client(&server, Some("squ_test"));
    let error = sonar.projects().delete("my-app").execute().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::RateLimit);
    match error {
        ApiError::RateLimited { retry_after, .. } => assert_eq!(retry_after, Some(30)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_body_has_no_messages() {
    let server = MockServer::start().await;
    mount_delete(&server, ResponseTemplate::new(404)).await;

    let sonar = create_client(&server, Some("squ_test"));
    let error = sonar.projects().delete("missing").execute().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(error.messages().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = SonarQubeConfig::builder()
        .server_url(ServerUrl::new("http://127.0.0.1:1").unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let sonar = SonarQube::new(&config).unwrap();

    let error = sonar.system().status().execute().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .expect(1)
        .mount(&server)
        .await;

    let sonar = create_client(&server, Some("squ_test"));
    let error = sonar.projects().search().execute().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Decode);
}

// ============================================================================
// Success bodies
// ============================================================================

#[tokio::test]
async fn test_no_content_decodes_to_unit() {
    let server = MockServer::start().await;
    mount_delete(&server, ResponseTemplate::new(204)).await;

    let sonar = create_client(&server, Some("squ_test"));
    sonar.projects().delete("my-app").execute().await.unwrap();
}

#[tokio::test]
async fn test_ping_returns_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let sonar = create_client(&server, None);
    let pong = sonar.system().ping().execute().await.unwrap();
    assert_eq!(pong, "pong");
}

#[tokio::test]
async fn test_status_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "20240101",
            "version": "10.4.1",
            "status": "UP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sonar = create_client(&server, None);
    let status = sonar.system().status().execute().await.unwrap();
    assert!(status.is_up());
}

// ============================================================================
// Authentication header
// ============================================================================

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/ping"))
        .and(header("Authorization", "Bearer squ_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&server)
        .await;

    let sonar = create_client(&server, Some("squ_secret"));
    sonar.system().ping().execute().await.unwrap();
}

/// Mounts `api/system/ping` so that it only answers requests without credentials.
async fn mount_anonymous_ping(server: &MockServer) {
    Mock::given(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    mount_anonymous_ping(&server).await;

    let sonar = create_client(&server, None);
    assert_eq!(sonar.system().ping().execute().await.unwrap(), "pong");
    server.verify().await;
}

#[tokio::test]
async fn test_empty_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    mount_anonymous_ping(&server).await;

    let config = SonarQubeConfig::builder()
        .server_url(ServerUrl::new(server.uri()).unwrap())
        .token(AccessToken::new(""))
        .build()
        .unwrap();
    let sonar = SonarQube::new(&config).unwrap();

    assert_eq!(sonar.system().ping().execute().await.unwrap(), "pong");
    server.verify().await;
}

// ============================================================================
// Truncated error bodies
// ============================================================================

/// Serves one response whose body is cut off after `{"errors":[`.
///
/// Returns the base URL of the listener.
async fn serve_truncated_error(status_line: &'static str, extra_headers: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Consume the whole request head before answering
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "{status_line}\r\n{extra_headers}Content-Type: application/json\r\nContent-Length: 200\r\n\r\n{{\"errors\":["
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

fn client_for(url: String) -> SonarQube {
    let config = SonarQubeConfig::builder()
        .server_url(ServerUrl::new(url).unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    SonarQube::new(&config).unwrap()
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status_classification() {
    let url = serve_truncated_error("HTTP/1.1 403 Forbidden", "").await;

    let error = client_for(url).system().status().execute().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Authorization);
    assert_eq!(error.status(), Some(403));
    assert!(error.messages().is_empty());
}

#[tokio::test]
async fn test_truncated_rate_limit_body_keeps_retry_after() {
    let url = serve_truncated_error("HTTP/1.1 429 Too Many Requests", "Retry-After: 12\r\n").await;

    let error = client_for(url).system().status().execute().await.unwrap_err();

    match error {
        ApiError::RateLimited { retry_after, .. } => assert_eq!(retry_after, Some(12)),
        other => panic!("unexpected error: {other:?}"),
    }
}
