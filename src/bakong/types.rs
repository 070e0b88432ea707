//! Request/response contracts for the Bakong API surface.
//!
//! The upstream wire shapes (`BakongStatusResponse`, `RenewTokenResponse`)
//! mirror the Bakong open API exactly; fields are passed through without
//! reinterpretation.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Request body for `POST /api/v1/bakong/generate-qr`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQrRequest {
    /// Transaction amount in USD
    pub amount: f64,
    /// Optional bill number stamped into the KHQR additional-data template
    #[serde(default)]
    pub bill_number: Option<String>,
}

/// Response body for a generated merchant QR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQrResponse {
    /// The KHQR payload string to be rendered as a QR code
    pub qr: String,
    /// MD5 fingerprint of the payload; the key for later status checks
    pub md5: String,
}

/// Request body for `POST /api/v1/bakong/qr-image`
///
/// The field defaults to empty so an absent key fails payload validation
/// (400) rather than body deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct QrImageRequest {
    #[serde(default)]
    pub qr: String,
}

/// Request body for `POST /api/v1/bakong/check-transaction`
///
/// Same defaulting rationale as [`QrImageRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct CheckTransactionRequest {
    #[serde(default)]
    pub md5: String,
}

/// Upstream transaction status response, field-mapped verbatim.
///
/// `response_code == 0` is the sole success predicate; it is derived, never
/// stored. The `data` payload's shape is owned by Bakong and is passed
/// through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakongStatusResponse {
    pub response_code: i32,
    pub response_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl BakongStatusResponse {
    pub fn is_success(&self) -> bool {
        self.response_code == 0
    }
}

/// Upstream envelope for `POST /v1/renew_token`.
///
/// Both levels are optional on the wire; an absent or null `data.token` is a
/// `TokenNotIssued` failure, decided by the caller.
#[derive(Debug, Deserialize)]
pub struct RenewTokenResponse {
    #[serde(default)]
    pub data: Option<RenewTokenData>,
}

#[derive(Debug, Deserialize)]
pub struct RenewTokenData {
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_success_is_derived_from_code() {
        let ok = BakongStatusResponse {
            response_code: 0,
            response_message: "success".to_string(),
            error_code: None,
            data: None,
        };
        assert!(ok.is_success());

        let failed = BakongStatusResponse {
            response_code: 1,
            response_message: "not found".to_string(),
            error_code: Some(1),
            data: None,
        };
        assert!(!failed.is_success());
    }

    #[test]
    fn status_response_round_trips_camel_case() {
        let body = r#"{"responseCode":0,"responseMessage":"success","data":{"amount":"10.00"}}"#;
        let parsed: BakongStatusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response_code, 0);
        assert_eq!(parsed.response_message, "success");
        assert_eq!(parsed.data.as_ref().unwrap()["amount"], "10.00");

        let serialized = serde_json::to_value(&parsed).unwrap();
        assert_eq!(serialized["responseCode"], 0);
        assert_eq!(serialized["data"]["amount"], "10.00");
        // absent optionals stay off the wire
        assert!(serialized.get("errorCode").is_none());
    }

    #[test]
    fn status_response_requires_response_code() {
        let body = r#"{"responseMessage":"success"}"#;
        assert!(serde_json::from_str::<BakongStatusResponse>(body).is_err());
    }

    #[test]
    fn renew_envelope_tolerates_missing_token() {
        let parsed: RenewTokenResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(parsed.data.unwrap().token.is_none());

        let parsed: RenewTokenResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.data.is_none());

        let parsed: RenewTokenResponse =
            serde_json::from_str(r#"{"data":{"token":null}}"#).unwrap();
        assert!(parsed.data.unwrap().token.is_none());
    }
}
