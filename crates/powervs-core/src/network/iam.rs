//! IBM Cloud IAM token exchange.
//!
//! An API key is traded for a short-lived bearer token. Tokens are reused
//! until shortly before they expire; the mutex is held across the refresh so
//! concurrent tool calls wait for a single exchange.

use crate::config::PowerVsDefaults;
use crate::network::client::HttpClient;
use crate::{PowerVsError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + PowerVsDefaults::TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Exchanges an API key for IAM bearer tokens.
pub struct IamAuthenticator {
    http: HttpClient,
    iam_url: String,
    api_key: String,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

impl IamAuthenticator {
    pub fn new(http: HttpClient, iam_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            iam_url: iam_url.into(),
            api_key: api_key.into(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, exchanging the API key when needed.
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("IAM token near expiry, refreshing");
        }

        let fresh = self.exchange().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Drop the cached token so the next call performs a fresh exchange.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn exchange(&self) -> Result<CachedToken> {
        let form = [
            ("grant_type", PowerVsDefaults::IAM_GRANT_TYPE),
            ("apikey", self.api_key.as_str()),
        ];

        let response: IamTokenResponse = self
            .http
            .post_form_json(&self.iam_url, &form, PowerVsDefaults::IAM_TIMEOUT)
            .await
            .map_err(|e| PowerVsError::Auth {
                message: e.to_string(),
            })?;

        let value = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PowerVsError::Auth {
                message: "IAM response did not contain an access_token".to_string(),
            })?;

        let expires_at = expiry_after(Instant::now(), response.expires_in);
        info!(
            "Obtained IAM token (valid for {}s)",
            expires_at.saturating_duration_since(Instant::now()).as_secs()
        );

        Ok(CachedToken { value, expires_at })
    }
}

/// Expiry instant for a token issued at `now`.
///
/// A missing `expires_in`, or one too large to represent, falls back to the
/// default lifetime.
fn expiry_after(now: Instant, expires_in: Option<u64>) -> Instant {
    let default = now + PowerVsDefaults::TOKEN_DEFAULT_LIFETIME;
    match expires_in {
        Some(secs) => now.checked_add(Duration::from_secs(secs)).unwrap_or(default),
        None => default,
    }
}
