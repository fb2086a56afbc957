//! Model invocation abstraction
//!
//! Handlers see one `ModelInvoker`; which strategy sits behind it is chosen
//! once from configuration.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::{Config, InvocationMode},
    error::AppResult,
    relay::{
        client::UpstreamClient,
        direct::{ResponseTarget, ResponsesInvoker},
        logging::RequestContext,
        workflow::WorkflowInvoker,
    },
};

/// Trait implemented by every invocation strategy
///
/// # Security
///
/// Implementations never forward caller headers upstream; credentials come
/// from configuration only.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Strategy name for logging and metrics
    fn name(&self) -> &'static str;

    /// Relay a message sequence and return the extracted reply text.
    ///
    /// The returned string is never empty.
    async fn invoke(&self, messages: &[Value], ctx: &RequestContext) -> AppResult<String>;
}

/// Build the invoker selected by `config.mode`
pub fn build_invoker(http_client: reqwest::Client, config: &Config) -> Result<Arc<dyn ModelInvoker>> {
    let upstream = UpstreamClient::new(http_client, config)?;

    let invoker: Arc<dyn ModelInvoker> = match &config.mode {
        InvocationMode::Direct { model } => Arc::new(ResponsesInvoker::new(
            upstream,
            ResponseTarget::Model(model.clone()),
            config,
        )),
        InvocationMode::Agent { agent_id } => Arc::new(ResponsesInvoker::new(
            upstream,
            ResponseTarget::Agent(agent_id.clone()),
            config,
        )),
        InvocationMode::Workflow { workflow_id } => Arc::new(WorkflowInvoker::new(
            upstream,
            workflow_id.clone(),
            config,
        )),
    };

    Ok(invoker)
}
