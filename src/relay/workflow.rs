//! Workflow run invocation
//!
//! Starts a run of a hosted workflow, then polls it at a flat interval until
//! it reaches a terminal status or the deadline passes. The loop is not tied
//! to the inbound connection: a disconnecting caller does not stop it.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    relay::{
        client::UpstreamClient,
        direct::Attachment,
        extract::{extract_text, RawFallback},
        invoker::ModelInvoker,
        logging::RequestContext,
        poll::{poll_until, PollOutcome, PollPolicy},
        run::{RunHandle, RunStatus},
    },
};

/// `tool_resources.file_search` of a run request
#[derive(Debug, Serialize)]
pub struct FileSearchResources<'a> {
    pub vector_store_ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ToolResources<'a> {
    pub file_search: FileSearchResources<'a>,
}

/// Body of the start-run request
#[derive(Debug, Serialize)]
pub struct StartRunRequest<'a> {
    pub input: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Invoker for asynchronous workflow runs
pub struct WorkflowInvoker {
    upstream: UpstreamClient,
    workflow_id: String,
    file_ids: Vec<String>,
    vector_store_ids: Vec<String>,
    policy: PollPolicy,
}

impl WorkflowInvoker {
    pub fn new(upstream: UpstreamClient, workflow_id: String, config: &Config) -> Self {
        Self {
            upstream,
            workflow_id,
            file_ids: config.file_ids.clone(),
            vector_store_ids: config.vector_store_ids.clone(),
            policy: config.poll_policy(),
        }
    }

    fn runs_path(&self) -> String {
        format!("/workflows/{}/runs", self.workflow_id)
    }

    fn run_path(&self, run_id: &str) -> String {
        format!("/workflows/{}/runs/{}", self.workflow_id, run_id)
    }

    /// Build the start-run body for a message sequence
    pub fn build_request<'a>(&'a self, messages: &'a [Value]) -> StartRunRequest<'a> {
        let tool_resources = (!self.vector_store_ids.is_empty()).then(|| ToolResources {
            file_search: FileSearchResources {
                vector_store_ids: &self.vector_store_ids,
            },
        });

        StartRunRequest {
            input: messages,
            tool_resources,
            attachments: self.file_ids.iter().map(|id| Attachment::file_search(id)).collect(),
        }
    }

    async fn start_run(&self, messages: &[Value], ctx: &RequestContext) -> AppResult<RunHandle> {
        let request = self.build_request(messages);
        let reply = self
            .upstream
            .post_json(&self.runs_path(), &request, ctx, |status, message| {
                AppError::UpstreamStart { status, message }
            })
            .await?;

        let run = RunHandle::from_value(reply)?;
        ctx.log_run_started(&run.id, &run.status_label);
        Ok(run)
    }

    async fn fetch_run(
        &self,
        run_id: &str,
        attempt: u32,
        ctx: &RequestContext,
    ) -> AppResult<RunHandle> {
        metrics::record_poll_attempt();

        let reply = self
            .upstream
            .get_json(&self.run_path(run_id), ctx, |status, message| {
                AppError::UpstreamPoll { status, message }
            })
            .await?;

        let run = RunHandle::from_value(reply)?;
        ctx.log_poll(&run.id, attempt, &run.status_label);
        Ok(run)
    }
}

#[async_trait]
impl ModelInvoker for WorkflowInvoker {
    fn name(&self) -> &'static str {
        "workflow"
    }

    async fn invoke(&self, messages: &[Value], ctx: &RequestContext) -> AppResult<String> {
        let started = self.start_run(messages, ctx).await?;
        let run_id = started.id.clone();

        let outcome = poll_until(
            &self.policy,
            started,
            |attempt| self.fetch_run(&run_id, attempt, ctx),
            |run| run.status.is_terminal(),
        )
        .await?;

        let run = match outcome {
            PollOutcome::Terminal { value, .. } => value,
            PollOutcome::TimedOut { last, .. } => {
                ctx.log_timeout(
                    &run_id,
                    self.policy.max_duration.as_millis(),
                    &last.status_label,
                );
                return Err(AppError::UpstreamIncomplete {
                    run_id,
                    status: last.status_label,
                    waited: self.policy.max_duration,
                });
            }
        };

        match run.status {
            RunStatus::Completed => Ok(extract_text(run.output(), RawFallback::Serialize)),
            status => Err(AppError::RunFailed {
                run_id,
                status,
                detail: run.error_detail(),
            }),
        }
    }
}

/// Metrics for workflow polling
pub mod metrics {
    use metrics::counter;

    /// Record one status poll, counted before the request is sent
    pub fn record_poll_attempt() {
        counter!("relay_poll_attempts_total").increment(1);
    }
}
