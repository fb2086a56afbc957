//! Relay module
//!
//! Handles forwarding chat messages to the upstream model API, waiting for
//! the result and turning it into plain text.

pub mod client;
pub mod direct;
pub mod extract;
pub mod headers;
pub mod invoker;
pub mod logging;
pub mod poll;
pub mod run;
pub mod workflow;

pub use client::UpstreamClient;
pub use direct::ResponsesInvoker;
pub use extract::{extract_text, RawFallback, PLACEHOLDER_TEXT};
pub use invoker::{build_invoker, ModelInvoker};
pub use logging::RequestContext;
pub use poll::{poll_until, PollOutcome, PollPolicy};
pub use run::{RunHandle, RunStatus};
pub use workflow::WorkflowInvoker;
