//! Workflow run handle and status lifecycle

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Status of an upstream workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Canceled,
    /// Any status this relay does not know; treated as still in flight
    Unknown,
}

impl RunStatus {
    /// Classify an upstream status label. `in_progress` and `cancelled` are
    /// accepted spellings.
    pub fn from_label(label: &str) -> Self {
        match label {
            "queued" => RunStatus::Queued,
            "running" | "in_progress" => RunStatus::Running,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "canceled" | "cancelled" => RunStatus::Canceled,
            _ => RunStatus::Unknown,
        }
    }

    /// Whether the run will not change status any more
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Canceled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Canceled => "canceled",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run as reported by the workflow API.
///
/// Only the fields the relay reads are typed; the full payload is kept in
/// `raw` for extraction.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub id: String,
    pub status: RunStatus,
    /// Status exactly as reported upstream, kept for messages and logs
    pub status_label: String,
    pub raw: Value,
}

#[derive(Deserialize)]
struct RunFields {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

impl RunHandle {
    /// Parse a run object, keeping the raw JSON alongside
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = RunFields::deserialize(&raw)?;
        let status_label = fields
            .status
            .unwrap_or_else(|| RunStatus::Queued.as_str().to_string());
        Ok(Self {
            id: fields.id,
            status: RunStatus::from_label(&status_label),
            status_label,
            raw,
        })
    }

    /// The part of the run that carries the result
    pub fn output(&self) -> &Value {
        match self.raw.get("output") {
            Some(output) if !output.is_null() => output,
            _ => &self.raw,
        }
    }

    /// Upstream error description for failed runs, if any
    pub fn error_detail(&self) -> Option<String> {
        let error = self.raw.get("error").or_else(|| self.raw.get("last_error"))?;
        let detail = match error {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(other.to_string())),
        };
        detail.filter(|s| !s.trim().is_empty())
    }
}
