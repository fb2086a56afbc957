//! Upstream model API client
//!
//! Thin JSON-over-HTTP wrapper around the model API. Non-2xx replies are
//! turned into an `AppError` by a caller-supplied mapper so the start, poll
//! and direct call sites can each report their own failure kind.

use anyhow::{Context, Result};
use axum::http::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    error::{upstream_message, AppError, AppResult},
    relay::{headers::build_default_headers, logging::RequestContext},
};

/// Maps an upstream status and message onto an application error
pub type FailureMapper = fn(StatusCode, String) -> AppError;

/// Model API client
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl UpstreamClient {
    /// Create a new upstream client from configuration
    pub fn new(client: reqwest::Client, config: &Config) -> Result<Self> {
        let headers = build_default_headers(
            &config.openai_api_key,
            config.openai_org_id.as_deref(),
            config.openai_beta.as_deref(),
        )
        .context("OPENAI_API_KEY, OPENAI_ORG_ID or OPENAI_BETA is not a valid header value")?;

        Ok(Self {
            client,
            base_url: config.openai_api_url.clone(),
            headers,
        })
    }

    /// POST a JSON body and parse the JSON reply
    #[instrument(skip(self, body, ctx, on_failure), fields(trace_id = %ctx.trace_id))]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        ctx: &RequestContext,
        on_failure: FailureMapper,
    ) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        ctx.log_upstream_request(&url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Failed to send request to model API");
                e
            })?;

        self.read_json(&url, response, ctx, on_failure).await
    }

    /// GET a resource and parse the JSON reply
    #[instrument(skip(self, ctx, on_failure), fields(trace_id = %ctx.trace_id))]
    pub async fn get_json(
        &self,
        path: &str,
        ctx: &RequestContext,
        on_failure: FailureMapper,
    ) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        ctx.log_upstream_request(&url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Failed to send request to model API");
                e
            })?;

        self.read_json(&url, response, ctx, on_failure).await
    }

    async fn read_json(
        &self,
        url: &str,
        response: reqwest::Response,
        ctx: &RequestContext,
        on_failure: FailureMapper,
    ) -> AppResult<Value> {
        let status = response.status();
        ctx.log_upstream_response(url, status.as_u16());

        let body = response.text().await?;

        if !status.is_success() {
            warn!(url = %url, status = %status, body = %body, "Model API request failed");
            return Err(on_failure(status, upstream_message(&body)));
        }

        debug!(url = %url, body_len = body.len(), "Model API response body");

        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse model API response");
            AppError::from(e)
        })
    }
}
