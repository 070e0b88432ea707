//! Bakong service facade: merchant QR generation, QR image rendering, and
//! the authenticated transaction-status proxy.

use crate::bakong::client::BakongHttpClient;
use crate::bakong::error::{BakongError, BakongResult};
use crate::bakong::khqr::{self, MerchantInfo};
use crate::bakong::qr_image;
use crate::bakong::token::BakongTokenService;
use crate::bakong::types::{
    BakongStatusResponse, CheckTransactionRequest, GenerateQrRequest, GenerateQrResponse,
    QrImageRequest,
};
use crate::config::BakongConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const CHECK_TRANSACTION_PATH: &str = "/v1/check_transaction_by_md5";

pub struct BakongService {
    config: BakongConfig,
    http: BakongHttpClient,
    tokens: Arc<BakongTokenService>,
}

impl BakongService {
    pub fn new(config: BakongConfig) -> BakongResult<Self> {
        let http = BakongHttpClient::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout),
        )?;
        let tokens = Arc::new(BakongTokenService::new(http.clone(), config.email.clone()));

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Build a merchant KHQR payload for the requested amount.
    pub fn generate_qr(&self, request: &GenerateQrRequest) -> BakongResult<GenerateQrResponse> {
        let merchant = MerchantInfo {
            bakong_account_id: self.config.account_id.clone(),
            merchant_id: self.config.merchant_id.clone(),
            acquiring_bank: self.config.acquiring_bank.clone(),
            merchant_name: self.config.merchant_name.clone(),
            merchant_city: self.config.merchant_city.clone(),
            mobile_number: self.config.mobile_number.clone(),
            store_label: self.config.store_label.clone(),
            bill_number: request.bill_number.clone(),
        };

        let qr = khqr::build_merchant_qr(&merchant, request.amount)?;
        let md5 = khqr::fingerprint(&qr);
        info!(md5 = %md5, amount = request.amount, "generated merchant QR");

        Ok(GenerateQrResponse { qr, md5 })
    }

    /// Render a KHQR payload string as a PNG image.
    pub fn qr_image(&self, request: &QrImageRequest) -> BakongResult<Vec<u8>> {
        qr_image::render_png(&request.qr)
    }

    /// Check a transaction's settlement status by its MD5 fingerprint.
    ///
    /// The response carries the upstream fields verbatim; `responseCode == 0`
    /// is the sole success predicate and is never recomputed locally. An
    /// upstream rejection (including 403) surfaces as-is and does not loop
    /// back into token renewal.
    pub async fn check_transaction(
        &self,
        request: &CheckTransactionRequest,
    ) -> BakongResult<BakongStatusResponse> {
        let md5 = validate_fingerprint(&request.md5)?;

        let token = self.tokens.get_token().await?;

        let body = serde_json::json!({ "md5": md5 });
        let response: BakongStatusResponse = self
            .http
            .post_json(CHECK_TRANSACTION_PATH, Some(&token), &body)
            .await?;

        info!(
            md5 = %md5,
            response_code = response.response_code,
            "checked transaction status"
        );
        Ok(response)
    }
}

/// A fingerprint is a 32-character case-insensitive hex string; anything else
/// is rejected before a single byte goes on the wire.
fn validate_fingerprint(md5: &str) -> BakongResult<&str> {
    let trimmed = md5.trim();
    if trimmed.is_empty() {
        return Err(BakongError::invalid_request("md5 is required", "md5"));
    }
    if trimmed.len() != 32 || hex::decode(trimmed).is_err() {
        return Err(BakongError::invalid_request(
            "md5 must be a 32-character hex string",
            "md5",
        ));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_validation_accepts_hex_of_either_case() {
        assert!(validate_fingerprint("deadbeefdeadbeefdeadbeefdeadbeef").is_ok());
        assert!(validate_fingerprint("DEADBEEFDEADBEEFDEADBEEFDEADBEEF").is_ok());
        assert_eq!(
            validate_fingerprint("  deadbeefdeadbeefdeadbeefdeadbeef  ").unwrap(),
            "deadbeefdeadbeefdeadbeefdeadbeef"
        );
    }

    #[test]
    fn fingerprint_validation_rejects_blank_and_malformed() {
        assert!(matches!(
            validate_fingerprint("").unwrap_err(),
            BakongError::InvalidRequest { .. }
        ));
        assert!(matches!(
            validate_fingerprint("   ").unwrap_err(),
            BakongError::InvalidRequest { .. }
        ));
        // too short
        assert!(validate_fingerprint("deadbeef").is_err());
        // right length, not hex
        assert!(validate_fingerprint("zzzzbeefdeadbeefdeadbeefdeadbeef").is_err());
    }
}
