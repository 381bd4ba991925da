//! HTTP transport integration tests
//!
//! Runs the live transport against a wiremock JSON-RPC server: handshake,
//! tool listing, call dispatch, retry policy, and state transitions.

use serde_json::{json, Map, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use toolgate::error::ToolgateError;
use toolgate::transport::{create_transport, ToolOutcome, Transport, TransportConfig, TransportState};

fn rpc_result(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": value,
    }))
}

fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": code, "message": message},
    }))
}

async fn mock_initialize(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "initialize"})))
        .respond_with(rpc_result(json!({"server": {"name": "test-server"}})))
        .mount(server)
        .await;
}

fn fast_config() -> TransportConfig {
    TransportConfig {
        timeout_ms: 2_000,
        retry_attempts: 3,
        retry_delay_ms: 10,
        extra: Default::default(),
    }
}

fn transport_for(server: &MockServer) -> Box<dyn Transport> {
    create_transport(&format!("{}/rpc", server.uri()), fast_config()).unwrap()
}

#[tokio::test]
async fn test_connect_list_and_call_flow() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "tools/list"})))
        .respond_with(rpc_result(json!({
            "tools": [
                {"name": "echo", "description": "Echoes input"},
                {"name": "todo.create"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({
            "method": "tools/call",
            "params": {"name": "echo"}
        })))
        .respond_with(rpc_result(json!({
            "success": true,
            "data": {"echo": "hi"}
        })))
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();
    assert_eq!(transport.state(), TransportState::Connected);

    let tools = transport.list_tools().await.unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "echo");
    assert_eq!(tools[0].description.as_deref(), Some("Echoes input"));

    let mut args = Map::new();
    args.insert("message".to_string(), json!("hi"));
    let outcome = transport.call_tool("echo", args).await.unwrap();
    let result = outcome.as_result().expect("envelope expected");
    assert!(result.is_success());
    assert_eq!(result.data().unwrap()["echo"], "hi");
}

#[tokio::test]
async fn test_call_returns_raw_value_unwrapped() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(rpc_result(json!({"status": "pong"})))
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();

    let outcome = transport.call_tool("ping", Map::new()).await.unwrap();
    assert_eq!(outcome, ToolOutcome::Raw(json!({"status": "pong"})));
}

#[tokio::test]
async fn test_method_not_found_maps_to_tool_not_found() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(rpc_error(-32601, "method not found"))
        .expect(1) // no retries for an answered error
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();

    let err = transport
        .call_tool("nonexistent", Map::new())
        .await
        .unwrap_err();
    match err.downcast_ref::<ToolgateError>() {
        Some(ToolgateError::ToolNotFound { tool_name }) => assert_eq!(tool_name, "nonexistent"),
        other => panic!("expected ToolNotFound, got {other:?}"),
    }
    // An answered error never changes connection state.
    assert_eq!(transport.state(), TransportState::Connected);
}

#[tokio::test]
async fn test_rpc_application_error_not_retried() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(rpc_error(-32000, "tool exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();

    let err = transport.call_tool("boom", Map::new()).await.unwrap_err();
    assert!(err.to_string().contains("tool exploded"));
    assert_eq!(transport.state(), TransportState::Connected);
}

#[tokio::test]
async fn test_http_failure_retried_then_surfaced() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    // Every tools/call attempt fails at the HTTP layer.
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "tools/call"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // retry_attempts sequential attempts
        .mount(&server)
        .await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();

    let err = transport.call_tool("flaky", Map::new()).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 500"));

    // The session itself still answers initialize, so after the failed call
    // the transport reconnects rather than sticking in error.
    assert_eq!(transport.state(), TransportState::Connected);
}

#[tokio::test]
async fn test_connect_failure_enters_error_state() {
    // Nothing mounted: wiremock answers 404 and the handshake fails.
    let server = MockServer::start().await;
    let mut transport = transport_for(&server);

    let err = transport.connect().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ToolgateError>(),
        Some(ToolgateError::Connection(_))
    ));
    assert_eq!(transport.state(), TransportState::Error);
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let server = MockServer::start().await;
    mock_initialize(&server).await;

    let mut transport = transport_for(&server);
    transport.connect().await.unwrap();
    transport.connect().await.unwrap();
    assert_eq!(transport.state(), TransportState::Connected);
}

#[tokio::test]
async fn test_list_tools_rejected_when_disconnected() {
    let server = MockServer::start().await;
    let transport = transport_for(&server);
    assert!(transport.list_tools().await.is_err());
}

#[tokio::test]
async fn test_extra_headers_sent_on_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(wiremock::matchers::header("Authorization", "Bearer tok"))
        .respond_with(rpc_result(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = fast_config();
    config.extra.insert(
        "headers".to_string(),
        json!({"Authorization": "Bearer tok"}),
    );
    let mut transport = create_transport(&format!("{}/rpc", server.uri()), config).unwrap();
    transport.connect().await.unwrap();
}
