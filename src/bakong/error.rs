use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BakongResult<T> = Result<T, BakongError>;

/// Failures of the Bakong integration, split by where the fault lies:
/// caller input, the token lifecycle, or the upstream call itself.
///
/// Network-level failures and structurally malformed responses are kept
/// distinct: callers may retry the former but must not blindly retry the
/// latter.
#[derive(Debug, Clone, Error)]
pub enum BakongError {
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        field: Option<String>,
    },

    #[error("Bakong did not issue a token")]
    TokenNotIssued,

    #[error("Token renewal failed: {message}")]
    TokenRenewalFailed { message: String },

    #[error("Bakong unreachable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Bakong rejected the request: HTTP {status}")]
    UpstreamRejected { status: u16, body: String },

    #[error("Malformed Bakong response: {message}")]
    MalformedUpstreamResponse { message: String },

    #[error("QR encoding failed: {message}")]
    QrEncodingFailed { message: String },
}

/// Machine-readable error codes for client handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[serde(rename = "TOKEN_NOT_ISSUED")]
    TokenNotIssued,
    #[serde(rename = "TOKEN_RENEWAL_FAILED")]
    TokenRenewalFailed,
    #[serde(rename = "UPSTREAM_UNAVAILABLE")]
    UpstreamUnavailable,
    #[serde(rename = "UPSTREAM_REJECTED")]
    UpstreamRejected,
    #[serde(rename = "MALFORMED_UPSTREAM_RESPONSE")]
    MalformedUpstreamResponse,
    #[serde(rename = "QR_ENCODING_FAILED")]
    QrEncodingFailed,
}

impl BakongError {
    pub fn invalid_request(message: impl Into<String>, field: impl Into<String>) -> Self {
        BakongError::InvalidRequest {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            BakongError::InvalidRequest { .. } => false,
            BakongError::TokenNotIssued => false,
            BakongError::TokenRenewalFailed { .. } => false,
            BakongError::UpstreamUnavailable { .. } => true,
            BakongError::UpstreamRejected { .. } => false,
            BakongError::MalformedUpstreamResponse { .. } => false,
            BakongError::QrEncodingFailed { .. } => false,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            BakongError::InvalidRequest { .. } => 400,
            BakongError::TokenNotIssued => 502,
            BakongError::TokenRenewalFailed { .. } => 502,
            BakongError::UpstreamUnavailable { .. } => 504,
            BakongError::UpstreamRejected { .. } => 502,
            BakongError::MalformedUpstreamResponse { .. } => 502,
            BakongError::QrEncodingFailed { .. } => 500,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            BakongError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            BakongError::TokenNotIssued => ErrorCode::TokenNotIssued,
            BakongError::TokenRenewalFailed { .. } => ErrorCode::TokenRenewalFailed,
            BakongError::UpstreamUnavailable { .. } => ErrorCode::UpstreamUnavailable,
            BakongError::UpstreamRejected { .. } => ErrorCode::UpstreamRejected,
            BakongError::MalformedUpstreamResponse { .. } => ErrorCode::MalformedUpstreamResponse,
            BakongError::QrEncodingFailed { .. } => ErrorCode::QrEncodingFailed,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            BakongError::InvalidRequest { message, .. } => message.clone(),
            BakongError::TokenNotIssued | BakongError::TokenRenewalFailed { .. } => {
                "Could not authenticate with Bakong. Please contact support".to_string()
            }
            BakongError::UpstreamUnavailable { .. } => {
                "Bakong is temporarily unavailable. Please retry shortly".to_string()
            }
            BakongError::UpstreamRejected { status, .. } => {
                format!("Bakong rejected the request (HTTP {})", status)
            }
            BakongError::MalformedUpstreamResponse { .. } => {
                "Bakong returned an unexpected response".to_string()
            }
            BakongError::QrEncodingFailed { .. } => {
                "Could not render the QR image".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_http_status_mapping_is_correct() {
        assert_eq!(
            BakongError::invalid_request("md5 is required", "md5").http_status_code(),
            400
        );
        assert_eq!(
            BakongError::UpstreamUnavailable {
                message: "timed out".to_string()
            }
            .http_status_code(),
            504
        );
        assert_eq!(
            BakongError::UpstreamRejected {
                status: 403,
                body: "forbidden".to_string()
            }
            .http_status_code(),
            502
        );
        assert_eq!(BakongError::TokenNotIssued.http_status_code(), 502);
    }

    #[test]
    fn retryable_flags_are_set() {
        assert!(BakongError::UpstreamUnavailable {
            message: "timeout".to_string()
        }
        .is_retryable());
        assert!(!BakongError::UpstreamRejected {
            status: 403,
            body: String::new()
        }
        .is_retryable());
        assert!(!BakongError::TokenRenewalFailed {
            message: "bad payload".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn error_codes_serialize_screaming_snake() {
        let code = serde_json::to_string(&ErrorCode::UpstreamRejected).unwrap();
        assert_eq!(code, "\"UPSTREAM_REJECTED\"");
    }
}
