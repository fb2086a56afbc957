//! Chat relay endpoint
//!
//! `POST /api/respond` takes `{ messages: [...] }` from the browser, relays it
//! through the configured invoker and answers `{ text }`.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use crate::{
    error::{AppError, AppResult},
    relay::RequestContext,
    routes::metrics::record_request,
    AppState,
};

/// Validated inbound chat request.
///
/// Messages are forwarded verbatim; only the array shape is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Value>,
}

impl ChatRequest {
    /// Parse and validate a raw request body. An empty body counts as `{}`.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body)
                .map_err(|e| AppError::InvalidRequest(format!("Invalid JSON body: {}", e)))?
        };

        match payload.get("messages") {
            Some(Value::Array(messages)) => Ok(Self {
                messages: messages.clone(),
            }),
            _ => Err(AppError::InvalidRequest("Missing messages".to_string())),
        }
    }
}

/// Successful relay response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondResponse {
    pub text: String,
}

/// Handle chat relay requests
pub async fn respond(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<RespondResponse>> {
    let request = ChatRequest::from_body(&body)?;
    relay_messages(&state, "/api/respond", &request.messages).await
}

/// Any method other than POST on the relay endpoint
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Run a message sequence through the invoker with logging and metrics
pub(crate) async fn relay_messages(
    state: &AppState,
    endpoint: &str,
    messages: &[Value],
) -> AppResult<Json<RespondResponse>> {
    let start_time = Instant::now();
    let invoker = state.invoker.name();
    let ctx = RequestContext::new(invoker, endpoint).with_message_count(messages.len());
    ctx.log_request_start();

    let result = state
        .invoker
        .invoke(messages, &ctx)
        .instrument(ctx.create_span())
        .await;

    let duration = start_time.elapsed().as_secs_f64();
    match result {
        Ok(text) => {
            record_request("success", invoker, duration);
            ctx.log_request_complete(text.len());
            Ok(Json(RespondResponse { text }))
        }
        Err(e) => {
            record_request(e.kind(), invoker, duration);
            ctx.log_error(&e.to_string());
            Err(e)
        }
    }
}
