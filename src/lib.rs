//! chat-relay - relay between a browser chat frontend and a hosted LLM API
//!
//! Validates `{ messages }` requests, hands them to the model API either as a
//! direct Responses call or as a polled workflow run, and answers with the
//! extracted reply text.

pub mod config;
pub mod error;
pub mod relay;
pub mod routes;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::{Config, InvocationMode};
pub use crate::error::{AppError, AppResult};
pub use crate::relay::{build_invoker, ModelInvoker};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Strategy that relays messages to the model API
    pub invoker: Arc<dyn ModelInvoker>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let invoker = build_invoker(http_client, &config)?;

        Ok(Self::with_invoker(config, invoker))
    }

    /// Create a state around an existing invoker
    pub fn with_invoker(config: Config, invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            invoker,
        }
    }
}
