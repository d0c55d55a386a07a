mod common;
use common::{quiet_logger, serve_once};

use human_mcp::config::Config;
use human_mcp::errors::ToolErrorKind;
use human_mcp::services::http_client::{
    build_shared_client, get_json, HttpClient, RequestOptions, Transport,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

fn http(token: Option<&str>, config: &Config) -> HttpClient {
    HttpClient::new(
        quiet_logger(),
        build_shared_client(config).expect("client"),
        token.map(|t| t.to_string()),
    )
}

#[tokio::test]
async fn non_success_status_fails_with_status_and_body() {
    let (base, server) = serve_once(400, "fail").await;
    let err = http(Some("tok"), &Config::default())
        .request(&format!("{}/custom-rules", base), RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Http);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "API error: 400: fail");
    server.await.unwrap();
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let (base, server) = serve_once(503, "busy").await;
    let err = http(Some("tok"), &Config::default())
        .request(&base, RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.message, "API error: 503: busy");
    server.await.unwrap();
}

#[tokio::test]
async fn get_sends_bearer_and_version_headers() {
    let (base, server) = serve_once(200, r#"{"result":true}"#).await;
    let client = http(Some("secret-token"), &Config::default());
    let body: Value = get_json(&client, &format!("{}/custom-rules", base))
        .await
        .unwrap();
    assert_eq!(body, json!({"result": true}));

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /custom-rules http/1.1"));
    assert!(request.contains("authorization: bearer secret-token"));
    assert!(request.contains(&format!(
        "x-px-mcp-version: {}",
        env!("CARGO_PKG_VERSION")
    )));
}

#[tokio::test]
async fn anonymous_client_sends_no_authorization() {
    let (base, server) = serve_once(200, "{}").await;
    http(None, &Config::default())
        .request(&base, RequestOptions::get())
        .await
        .unwrap();
    let request = server.await.unwrap().to_lowercase();
    assert!(!request.contains("authorization:"));
    assert!(request.contains("x-px-mcp-version:"));
}

#[tokio::test]
async fn body_is_sent_as_json() {
    let (base, server) = serve_once(200, "{}").await;
    let options = RequestOptions {
        method: reqwest::Method::POST,
        headers: vec![("x-trace".to_string(), "t1".to_string())],
        body: Some(json!({"a": 1})),
    };
    let response = http(Some("tok"), &Config::default())
        .request(&base, options)
        .await
        .unwrap();
    assert_eq!(response.status, 200);

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(lower.starts_with("post / http/1.1"));
    assert!(lower.contains("content-type: application/json"));
    assert!(lower.contains("x-trace: t1"));
    assert!(request.ends_with(r#"{"a":1}"#));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hold = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let config = Config::default().with_timeout_ms(200);
    let err = http(Some("tok"), &config)
        .request(&format!("http://{}", addr), RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Timeout);
    assert_eq!(err.message, "HTTP request timed out");
    hold.abort();
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = http(Some("tok"), &Config::default())
        .request(&format!("http://{}", addr), RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Network);
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() {
    let (base, server) = serve_once(200, "<html>").await;
    let client = http(Some("tok"), &Config::default());
    let err = get_json::<Value>(&client, &base).await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Decode);
    assert!(err.message.starts_with("Invalid JSON response"));
    server.await.unwrap();
}
