use crate::bakong::error::{BakongError, BakongResult};
use reqwest::header;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

/// Thin client for the Bakong open API.
///
/// One attempt per call; the bounded request timeout is the only cancellation
/// mechanism. Retry policy belongs to the caller, which knows whether the
/// failure class is safe to retry.
#[derive(Clone)]
pub struct BakongHttpClient {
    client: Client,
    base_url: String,
}

impl BakongHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> BakongResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            BakongError::UpstreamUnavailable {
                message: format!("failed to initialize HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the JSON response into `T`.
    ///
    /// Failure classification: send/timeout errors are `UpstreamUnavailable`,
    /// a non-2xx status is `UpstreamRejected` with status and body preserved,
    /// and a 2xx body that does not decode into `T` is
    /// `MalformedUpstreamResponse`.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer_token: Option<&str>,
        body: &JsonValue,
    ) -> BakongResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "calling Bakong");

        let mut request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BakongError::UpstreamUnavailable {
                message: if e.is_timeout() {
                    format!("request to {} timed out", path)
                } else {
                    format!("request to {} failed: {}", path, e)
                },
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BakongError::UpstreamUnavailable {
                message: format!("failed to read response from {}: {}", path, e),
            })?;

        if !status.is_success() {
            return Err(BakongError::UpstreamRejected {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| BakongError::MalformedUpstreamResponse {
            message: format!("invalid JSON body from {}: {}", path, e),
        })
    }
}
