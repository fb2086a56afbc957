//! Header utilities for upstream requests
//!
//! The relay never forwards caller headers; every upstream request carries
//! only the headers built here from configuration.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE,
};

/// Organization header understood by the model API
pub const ORGANIZATION_HEADER: HeaderName = HeaderName::from_static("openai-organization");
/// Beta-feature opt-in header
pub const BETA_HEADER: HeaderName = HeaderName::from_static("openai-beta");

/// Build the fixed header set for upstream requests
pub fn build_default_headers(
    api_key: &str,
    organization: Option<&str>,
    beta: Option<&str>,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(org) = organization {
        headers.insert(ORGANIZATION_HEADER, HeaderValue::from_str(org)?);
    }
    if let Some(beta) = beta {
        headers.insert(BETA_HEADER, HeaderValue::from_str(beta)?);
    }

    Ok(headers)
}
