//! Mock model API for testing
//!
//! Provides wiremock-based mocks for the endpoints the relay calls:
//! - POST /responses - Direct Responses API
//! - POST /workflows/{id}/runs - Start a workflow run
//! - GET /workflows/{id}/runs/{run_id} - Poll a workflow run
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::openai::{MockOpenAI, ResponsesTestData};
//!
//! #[tokio::test]
//! async fn test_with_openai_mock() {
//!     let mock = MockOpenAI::start().await;
//!     mock.mock_response_success(ResponsesTestData::with_output_text("Hi")).await;
//!     // Use mock.uri() as OPENAI_API_URL
//! }
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::common::constants;

/// Mock model API server wrapper
pub struct MockOpenAI {
    server: MockServer,
}

impl MockOpenAI {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// All requests received so far
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received for one path
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    // =========================================================================
    // POST /responses - Direct Responses API
    // =========================================================================

    /// Mock a successful Responses call (requires the test bearer token)
    pub async fn mock_response_success(&self, response: Value) {
        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header(
                "Authorization",
                format!("Bearer {}", constants::TEST_OPENAI_API_KEY).as_str(),
            ))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mock 401 Unauthorized for the Responses call
    pub async fn mock_response_unauthorized(&self) {
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
                "Incorrect API key provided",
                "invalid_request_error",
            )))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Workflow runs
    // =========================================================================

    /// Mock starting a run that is reported with `status`
    pub async fn mock_run_start(&self, workflow_id: &str, run: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/workflows/{}/runs", workflow_id)))
            .and(header("OpenAI-Beta", constants::TEST_BETA_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(run))
            .mount(&self.server)
            .await;
    }

    /// Mock the start call failing with `status`
    pub async fn mock_run_start_error(&self, workflow_id: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/workflows/{}/runs", workflow_id)))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(error_body(message, "invalid_request_error")),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock polling: `pending` answers for the first `times` polls, then
    /// `terminal` for every later poll.
    pub async fn mock_run_poll_sequence(
        &self,
        workflow_id: &str,
        run_id: &str,
        pending: Value,
        times: u64,
        terminal: Value,
    ) {
        let run_path = format!("/workflows/{}/runs/{}", workflow_id, run_id);

        if times > 0 {
            Mock::given(method("GET"))
                .and(path(run_path.as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(pending))
                .up_to_n_times(times)
                .mount(&self.server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path(run_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(terminal))
            .mount(&self.server)
            .await;
    }

    /// Mock every poll answering with the same run
    pub async fn mock_run_poll(&self, workflow_id: &str, run_id: &str, run: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/workflows/{}/runs/{}", workflow_id, run_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(run))
            .mount(&self.server)
            .await;
    }

    /// Mock polling failing with `status`
    pub async fn mock_run_poll_error(&self, workflow_id: &str, run_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/workflows/{}/runs/{}", workflow_id, run_id)))
            .respond_with(ResponseTemplate::new(status).set_body_string("bad gateway"))
            .mount(&self.server)
            .await;
    }
}

/// Upstream error body in the model API's format
pub fn error_body(message: &str, error_type: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": null,
            "code": null
        }
    })
}

/// Canned Responses API payloads
pub struct ResponsesTestData;

impl ResponsesTestData {
    /// Response with a populated `output_text`
    pub fn with_output_text(text: &str) -> Value {
        json!({
            "id": "resp_test123",
            "object": "response",
            "status": "completed",
            "model": "gpt-4o-mini",
            "output_text": text,
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text, "annotations": []}]
            }]
        })
    }

    /// Response with an empty `output_text` but text in content parts
    pub fn with_content_parts(parts: &[&str]) -> Value {
        let content: Vec<Value> = parts
            .iter()
            .map(|p| json!({"type": "output_text", "text": p, "annotations": []}))
            .collect();
        json!({
            "id": "resp_test456",
            "object": "response",
            "status": "completed",
            "output_text": "",
            "output": [
                {"type": "file_search_call", "id": "fs_1", "status": "completed"},
                {"type": "message", "role": "assistant", "content": content}
            ]
        })
    }

    /// Response carrying no text at all
    pub fn empty() -> Value {
        json!({
            "id": "resp_empty",
            "object": "response",
            "status": "completed",
            "output": []
        })
    }
}

/// Canned workflow run payloads
pub struct RunTestData;

impl RunTestData {
    pub fn with_status(run_id: &str, status: &str) -> Value {
        json!({"id": run_id, "object": "workflow.run", "status": status})
    }

    pub fn completed(run_id: &str, output: Value) -> Value {
        json!({
            "id": run_id,
            "object": "workflow.run",
            "status": "completed",
            "output": output
        })
    }

    pub fn failed(run_id: &str, message: &str) -> Value {
        json!({
            "id": run_id,
            "object": "workflow.run",
            "status": "failed",
            "error": {"code": "server_error", "message": message}
        })
    }
}
