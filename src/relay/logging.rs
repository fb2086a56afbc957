//! Request logging for relayed calls
//!
//! Structured logging with a short correlation ID so a single browser
//! request can be followed through the upstream call and every poll.

use std::time::Instant;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

/// Context for tracking a request through the relay
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Invocation strategy handling this request
    pub invoker: String,
    /// Inbound endpoint being served
    pub endpoint: String,
    /// Number of chat messages relayed
    pub message_count: usize,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(invoker: &str, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            invoker: invoker.to_string(),
            endpoint: endpoint.to_string(),
            message_count: 0,
        }
    }

    /// Set the number of relayed messages
    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            endpoint = %self.endpoint,
            messages = %self.message_count,
            "Request started"
        );
    }

    /// Log request being sent upstream
    pub fn log_upstream_request(&self, url: &str) {
        debug!(
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to upstream"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, url: &str, status: u16) {
        debug!(
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            url = %url,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log a workflow run being accepted upstream
    pub fn log_run_started(&self, run_id: &str, status: &str) {
        info!(
            trace_id = %self.trace_id,
            run_id = %run_id,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Workflow run started"
        );
    }

    /// Log one poll observation
    pub fn log_poll(&self, run_id: &str, attempt: u32, status: &str) {
        debug!(
            trace_id = %self.trace_id,
            run_id = %run_id,
            attempt = %attempt,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Polled workflow run"
        );
    }

    /// Log a run that never reached a terminal status
    pub fn log_timeout(&self, run_id: &str, timeout_ms: u128, status: &str) {
        warn!(
            trace_id = %self.trace_id,
            run_id = %run_id,
            timeout_ms = %timeout_ms,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Workflow run timed out"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self, text_len: usize) {
        info!(
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            endpoint = %self.endpoint,
            text_len = %text_len,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed successfully"
        );
    }

    /// Log request failure
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            endpoint = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Relay request failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            invoker = %self.invoker,
            endpoint = %self.endpoint,
        )
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown", "unknown")
    }
}
