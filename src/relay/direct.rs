//! Direct Responses API invocation
//!
//! One blocking call to `/responses`, addressed either to a model or to a
//! hosted agent. File search is enabled when file or vector store ids are
//! configured.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    relay::{
        client::UpstreamClient,
        extract::{extract_text, RawFallback},
        invoker::ModelInvoker,
        logging::RequestContext,
    },
};

const RESPONSES_PATH: &str = "/responses";

/// What the Responses call is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseTarget {
    Model(String),
    Agent(String),
}

/// Tool entry in a Responses request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileSearchTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vector_store_ids: Vec<String>,
}

impl FileSearchTool {
    fn new(vector_store_ids: Vec<String>) -> Self {
        Self {
            tool_type: "file_search",
            vector_store_ids,
        }
    }
}

/// Per-file attachment enabling file search on that file
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<FileSearchTool>,
}

impl Attachment {
    /// Attach a file with file search enabled on it
    pub fn file_search(file_id: &str) -> Self {
        Self {
            file_id: file_id.to_string(),
            tools: vec![FileSearchTool::new(Vec::new())],
        }
    }
}

/// Responses API request body
#[derive(Debug, Serialize)]
pub struct ResponsesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
    pub input: &'a [Value],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FileSearchTool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Invoker for the synchronous Responses API
pub struct ResponsesInvoker {
    upstream: UpstreamClient,
    target: ResponseTarget,
    instructions: Option<String>,
    file_ids: Vec<String>,
    vector_store_ids: Vec<String>,
}

impl ResponsesInvoker {
    pub fn new(upstream: UpstreamClient, target: ResponseTarget, config: &Config) -> Self {
        Self {
            upstream,
            target,
            instructions: config.instructions.clone(),
            file_ids: config.file_ids.clone(),
            vector_store_ids: config.vector_store_ids.clone(),
        }
    }

    /// Build the request body for a message sequence
    pub fn build_request<'a>(&'a self, messages: &'a [Value]) -> ResponsesRequest<'a> {
        let (model, agent) = match &self.target {
            ResponseTarget::Model(model) => (Some(model.as_str()), None),
            ResponseTarget::Agent(agent) => (None, Some(agent.as_str())),
        };

        let attachments: Vec<Attachment> =
            self.file_ids.iter().map(|id| Attachment::file_search(id)).collect();

        let tools = if !self.vector_store_ids.is_empty() {
            vec![FileSearchTool::new(self.vector_store_ids.clone())]
        } else if !attachments.is_empty() {
            vec![FileSearchTool::new(Vec::new())]
        } else {
            Vec::new()
        };

        ResponsesRequest {
            model,
            agent,
            instructions: self.instructions.as_deref(),
            input: messages,
            tools,
            attachments,
        }
    }
}

#[async_trait]
impl ModelInvoker for ResponsesInvoker {
    fn name(&self) -> &'static str {
        match self.target {
            ResponseTarget::Model(_) => "direct",
            ResponseTarget::Agent(_) => "agent",
        }
    }

    async fn invoke(&self, messages: &[Value], ctx: &RequestContext) -> AppResult<String> {
        let request = self.build_request(messages);

        let response = self
            .upstream
            .post_json(RESPONSES_PATH, &request, ctx, |status, message| {
                AppError::UpstreamCall { status, message }
            })
            .await?;

        Ok(extract_text(&response, RawFallback::Placeholder))
    }
}
