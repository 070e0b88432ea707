//! Bearer-token lifecycle for the Bakong open API.
//!
//! Bakong issues short-lived bearer tokens through a login call keyed by the
//! registered account email. The token itself is the only authoritative
//! source of its expiry: it is a three-segment `header.payload.signature`
//! structure whose JSON payload carries an `exp` claim in epoch seconds.
//! Nothing in the HTTP envelope duplicates that window, so renewal decodes
//! the middle segment to learn when the token dies.

use crate::bakong::client::BakongHttpClient;
use crate::bakong::error::{BakongError, BakongResult};
use crate::bakong::types::RenewTokenResponse;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

const RENEW_TOKEN_PATH: &str = "/v1/renew_token";

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// A token is valid strictly before its expiry instant.
    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Serves a currently-valid bearer token, renewing on demand.
///
/// The read-or-renew decision and the store of a renewed token form one
/// critical section under `current`'s mutex, held across the renewal await.
/// Concurrent callers queue behind an in-flight renewal rather than racing
/// their own, so at most one renewal call is ever outstanding.
pub struct BakongTokenService {
    http: BakongHttpClient,
    email: String,
    current: Mutex<Option<CachedToken>>,
}

impl BakongTokenService {
    pub fn new(http: BakongHttpClient, email: impl Into<String>) -> Self {
        Self {
            http,
            email: email.into(),
            current: Mutex::new(None),
        }
    }

    /// Return the cached token if still valid, otherwise renew and cache.
    ///
    /// On renewal failure the previous entry (even an expired one) is left
    /// untouched; no partial token is ever stored.
    pub async fn get_token(&self) -> BakongResult<String> {
        let mut current = self.current.lock().await;

        if let Some(cached) = current.as_ref() {
            if cached.is_valid_at(Utc::now()) {
                debug!("using cached Bakong token");
                return Ok(cached.token.clone());
            }
        }

        info!("renewing Bakong token");
        let renewed = self.renew().await?;
        info!(expires_at = %renewed.expires_at, "obtained new Bakong token");

        let token = renewed.token.clone();
        *current = Some(renewed);
        Ok(token)
    }

    async fn renew(&self) -> BakongResult<CachedToken> {
        let body = serde_json::json!({ "email": self.email });

        // A 2xx body that fails to decode is a structural fault of the
        // renewal protocol, not of the transport.
        let envelope: RenewTokenResponse =
            match self.http.post_json(RENEW_TOKEN_PATH, None, &body).await {
                Ok(envelope) => envelope,
                Err(BakongError::MalformedUpstreamResponse { message }) => {
                    return Err(BakongError::TokenRenewalFailed { message })
                }
                Err(e) => return Err(e),
            };

        let token = envelope
            .data
            .and_then(|data| data.token)
            .filter(|token| !token.is_empty())
            .ok_or(BakongError::TokenNotIssued)?;

        let expires_at = decode_token_expiry(&token)?;

        Ok(CachedToken { token, expires_at })
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
}

/// Decode the expiry embedded in a Bakong bearer token.
///
/// Documented assumption about an upstream-owned format: three dot-delimited
/// segments, the middle one base64url-encoded JSON with an `exp` claim in
/// epoch seconds. If Bakong changes its token format, this function is the
/// only place that needs to follow.
pub(crate) fn decode_token_expiry(token: &str) -> BakongResult<DateTime<Utc>> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(BakongError::TokenRenewalFailed {
            message: format!(
                "token has {} segments, expected header.payload.signature",
                segments.len()
            ),
        });
    }

    let raw = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| BakongError::TokenRenewalFailed {
            message: format!("token payload is not valid base64url: {}", e),
        })?;

    let claims: TokenClaims =
        serde_json::from_slice(&raw).map_err(|e| BakongError::TokenRenewalFailed {
            message: format!("token payload is not valid JSON with an exp claim: {}", e),
        })?;

    DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| BakongError::TokenRenewalFailed {
        message: format!("token exp {} is out of range", claims.exp),
    })
}
