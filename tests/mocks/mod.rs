//! Mock infrastructure for testing external services
//!
//! Provides a wiremock server standing in for the hosted model API, with
//! canned payloads for the Responses and workflow run endpoints.

pub mod openai;

pub use openai::*;
