//! Configuration management for the relay
//!
//! Configuration is loaded from environment variables once at startup and
//! handed to the application state explicitly.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::relay::PollPolicy;

/// Default upstream API base URL
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
/// Default model for direct mode
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Beta header value sent in workflow mode unless overridden
pub const DEFAULT_WORKFLOW_BETA: &str = "workflows=v1";

/// How chat messages are handed to the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// One blocking Responses call against a model
    Direct { model: String },
    /// One blocking Responses call against a hosted agent
    Agent { agent_id: String },
    /// Start a workflow run and poll it to a terminal status
    Workflow { workflow_id: String },
}

impl InvocationMode {
    /// Short label used in logs, metrics and health output
    pub fn label(&self) -> &'static str {
        match self {
            InvocationMode::Direct { .. } => "direct",
            InvocationMode::Agent { .. } => "agent",
            InvocationMode::Workflow { .. } => "workflow",
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream API base URL
    pub openai_api_url: String,
    /// Upstream API key, forwarded as a bearer token
    pub openai_api_key: String,
    /// Optional organization header
    pub openai_org_id: Option<String>,
    /// Optional beta-feature header
    pub openai_beta: Option<String>,

    /// Selected invocation strategy
    pub mode: InvocationMode,
    /// System instructions sent with direct and agent calls
    pub instructions: Option<String>,
    /// Files attached for file search
    pub file_ids: Vec<String>,
    /// Vector stores attached for file search
    pub vector_store_ids: Vec<String>,

    /// Delay between workflow status polls (in milliseconds)
    pub poll_interval_ms: u64,
    /// Wall-clock budget for a workflow run (in milliseconds)
    pub poll_timeout_ms: u64,
    /// Per-call timeout for outbound HTTP requests (in seconds)
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode = resolve_mode(
            var("RELAY_MODE").as_deref(),
            var("OPENAI_MODEL"),
            var("OPENAI_AGENT_ID"),
            var("OPENAI_WORKFLOW_ID"),
        )?;

        let instructions = match (var("RELAY_INSTRUCTIONS"), var("RELAY_INSTRUCTIONS_FILE")) {
            (Some(text), _) => Some(text),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read RELAY_INSTRUCTIONS_FILE {}", path))?;
                Some(text.trim().to_string()).filter(|t| !t.is_empty())
            }
            (None, None) => None,
        };

        let openai_beta = var("OPENAI_BETA").or_else(|| match mode {
            InvocationMode::Workflow { .. } => Some(DEFAULT_WORKFLOW_BETA.to_string()),
            _ => None,
        });

        Ok(Self {
            host: var("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("RELAY_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("Invalid RELAY_PORT")?,

            openai_api_url: var("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            openai_api_key: var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_org_id: var("OPENAI_ORG_ID"),
            openai_beta,

            mode,
            instructions,
            file_ids: parse_id_list(var("OPENAI_FILE_IDS").as_deref()),
            vector_store_ids: parse_id_list(var("OPENAI_VECTOR_STORE_IDS").as_deref()),

            poll_interval_ms: var("RELAY_POLL_INTERVAL_MS")
                .unwrap_or_else(|| "1200".to_string())
                .parse()
                .context("Invalid RELAY_POLL_INTERVAL_MS")?,
            poll_timeout_ms: var("RELAY_POLL_TIMEOUT_MS")
                .unwrap_or_else(|| "60000".to_string())
                .parse()
                .context("Invalid RELAY_POLL_TIMEOUT_MS")?,
            upstream_timeout_secs: var("RELAY_UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse()
                .context("Invalid RELAY_UPSTREAM_TIMEOUT_SECS")?,
        })
    }

    /// Poll policy for workflow runs
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.poll_timeout_ms),
        )
    }
}

/// Pick the invocation mode from an explicit `RELAY_MODE` or from whichever
/// identifier is present.
fn resolve_mode(
    explicit: Option<&str>,
    model: Option<String>,
    agent_id: Option<String>,
    workflow_id: Option<String>,
) -> Result<InvocationMode> {
    let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mode = match explicit.map(|m| m.to_ascii_lowercase()) {
        Some(m) if m == "direct" => InvocationMode::Direct { model },
        Some(m) if m == "agent" => InvocationMode::Agent {
            agent_id: agent_id.context("OPENAI_AGENT_ID must be set when RELAY_MODE=agent")?,
        },
        Some(m) if m == "workflow" => InvocationMode::Workflow {
            workflow_id: workflow_id
                .context("OPENAI_WORKFLOW_ID must be set when RELAY_MODE=workflow")?,
        },
        Some(other) => bail!("Invalid RELAY_MODE '{}': expected direct, agent or workflow", other),
        None => match (workflow_id, agent_id) {
            (Some(workflow_id), _) => InvocationMode::Workflow { workflow_id },
            (None, Some(agent_id)) => InvocationMode::Agent { agent_id },
            (None, None) => InvocationMode::Direct { model },
        },
    };

    Ok(mode)
}

/// Split a comma-separated identifier list, dropping blanks
pub fn parse_id_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
