//! HTTP client for the PowerVS REST API.
//!
//! Thin wrapper around reqwest that:
//! - attaches the bearer token and optional workspace `CRN` header
//! - applies per-request timeouts
//! - turns non-2xx responses into [`PowerVsError::Http`]

use crate::config::PowerVsDefaults;
use crate::{PowerVsError, Result};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Header carrying the workspace CRN on PowerVS requests.
pub const CRN_HEADER: &str = "CRN";

/// HTTP client shared by the IAM and PowerVS calls.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(PowerVsDefaults::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(PowerVsDefaults::USER_AGENT)
            .build()
            .map_err(|e| PowerVsError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// GET a PowerVS resource and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: &str,
        workspace_crn: Option<&str>,
        timeout: Duration,
    ) -> Result<T> {
        debug!("GET {} (crn: {:?})", url, workspace_crn);

        let mut request = self
            .client
            .get(url)
            .timeout(timeout)
            .bearer_auth(bearer_token)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(crn) = workspace_crn {
            request = request.header(CRN_HEADER, crn);
        }

        let response = request.send().await?;
        let response = check_response_status(response, url).await?;
        response.json::<T>().await.map_err(|e| PowerVsError::Json {
            message: format!("Failed to parse response from {}: {}", url, e),
            source: None,
        })
    }

    /// POST a URL-encoded form and decode its JSON body.
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;
        let response = check_response_status(response, url).await?;
        response.json::<T>().await.map_err(|e| PowerVsError::Json {
            message: format!("Failed to parse response from {}: {}", url, e),
            source: None,
        })
    }
}

async fn check_response_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .ok()
        .map(|text| truncate_body(&text))
        .filter(|text| !text.is_empty());

    Err(PowerVsError::Http {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

fn truncate_body(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Percent-encode a caller-supplied id for use as a single path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
