//! Direct-mode relay integration tests
//!
//! Tests for POST /api/respond against a mocked Responses API:
//! - Request validation (method, missing or malformed messages)
//! - Text extraction from output_text and content parts
//! - Upstream failures

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{agent_mode, constants, direct_mode, test_config, test_server};
use crate::mocks::{MockOpenAI, ResponsesTestData};

fn messages() -> Value {
    json!({
        "messages": [
            {"role": "user", "content": "What are push and pull factors?"}
        ]
    })
}

#[tokio::test]
async fn test_primary_text_returned_verbatim() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_output_text(
        "### Push vs pull\n- Push: conflict\n- Pull: jobs",
    ))
    .await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({"text": "### Push vs pull\n- Push: conflict\n- Pull: jobs"})
    );
}

#[tokio::test]
async fn test_request_forwarded_with_model_instructions_and_headers() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_output_text("ok"))
        .await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    server.post("/api/respond").json(&messages()).await;

    let requests = mock.requests_to("/responses").await;
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(
        request.headers.get("OpenAI-Organization").unwrap(),
        constants::TEST_ORG_ID
    );
    assert!(request.headers.get("OpenAI-Beta").is_none());

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        json!({
            "model": "gpt-4o-mini",
            "instructions": "You are a concise tutor.",
            "input": [{"role": "user", "content": "What are push and pull factors?"}]
        })
    );
}

#[tokio::test]
async fn test_file_ids_enable_file_search() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_output_text("ok"))
        .await;
    let mut config = test_config(&mock.uri(), direct_mode());
    config.file_ids = vec!["file-syllabus".to_string()];
    let server = test_server(config);

    server.post("/api/respond").json(&messages()).await;

    let requests = mock.requests_to("/responses").await;
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["tools"], json!([{"type": "file_search"}]));
    assert_eq!(
        body["attachments"],
        json!([{"file_id": "file-syllabus", "tools": [{"type": "file_search"}]}])
    );
}

#[tokio::test]
async fn test_agent_mode_addresses_agent() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_output_text("Hello from the agent!"))
        .await;
    let server = test_server(test_config(&mock.uri(), agent_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["text"], "Hello from the agent!");

    let requests = mock.requests_to("/responses").await;
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["agent"], constants::TEST_AGENT_ID);
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn test_content_parts_joined_when_primary_empty() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_content_parts(&[
        "Stage 1: high birth rates.",
        "Stage 2: falling death rates.",
    ]))
    .await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["text"],
        "Stage 1: high birth rates.\nStage 2: falling death rates."
    );
}

#[tokio::test]
async fn test_placeholder_when_no_text() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::empty()).await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["text"],
        chat_relay::relay::PLACEHOLDER_TEXT
    );
}

#[tokio::test]
async fn test_non_array_messages_rejected() {
    let mock = MockOpenAI::start().await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    for body in [
        json!({"messages": "hello"}),
        json!({"messages": {"role": "user", "content": "hi"}}),
        json!({"messages": null}),
        json!({"message": []}),
    ] {
        let response = server.post("/api/respond").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.json::<Value>(), json!({"error": "Missing messages"}));
    }

    let response = server.post("/api/respond").text("{not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(mock.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_non_post_methods_rejected() {
    let mock = MockOpenAI::start().await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = server.method(method.clone(), "/api/respond").await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.json::<Value>(), json!({"error": "Use POST"}));
    }

    assert!(mock.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_upstream_error_returns_500_with_message() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_unauthorized().await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("Incorrect API key provided"), "{error}");
    assert!(error.contains("401"), "{error}");
}

#[tokio::test]
async fn test_unreachable_upstream_returns_500() {
    // Nothing listens on the discard port
    let server = test_server(test_config("http://127.0.0.1:9", direct_mode()));

    let response = server.post("/api/respond").json(&messages()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_smoke_endpoint_uses_fixed_prompt() {
    let mock = MockOpenAI::start().await;
    mock.mock_response_success(ResponsesTestData::with_output_text("Hello from the chat relay!"))
        .await;
    let server = test_server(test_config(&mock.uri(), direct_mode()));

    let response = server.get("/api/test").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["text"], "Hello from the chat relay!");

    let requests = mock.requests_to("/responses").await;
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["input"],
        json!([{"role": "user", "content": chat_relay::routes::smoke::SMOKE_PROMPT}])
    );
}
