//! Smoke-test endpoint
//!
//! `GET /api/test` sends a fixed one-line prompt through the configured
//! invoker, to check credentials and upstream wiring from a browser.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    routes::respond::{relay_messages, RespondResponse},
    AppState,
};

/// Prompt used by the smoke test
pub const SMOKE_PROMPT: &str = "Say 'Hello from the chat relay!' in one sentence.";

fn smoke_messages() -> Vec<Value> {
    vec![json!({ "role": "user", "content": SMOKE_PROMPT })]
}

/// Handler for GET /api/test
pub async fn smoke_test(State(state): State<Arc<AppState>>) -> AppResult<Json<RespondResponse>> {
    relay_messages(&state, "/api/test", &smoke_messages()).await
}
