//! KHQR merchant payload construction.
//!
//! KHQR is Cambodia's profile of the EMVCo merchant-presented-mode QR
//! format: a flat string of `id` + two-digit length + value fields,
//! terminated by a CRC-16/CCITT-FALSE checksum over the whole payload
//! including the CRC field's own `6304` prefix. The payload format is an
//! upstream-owned contract; this module is the single place that knows it.

use crate::bakong::error::{BakongError, BakongResult};
use crc::{Algorithm, Crc};

// EMVCo field ids used by the merchant payload
const ID_PAYLOAD_FORMAT: &str = "00";
const ID_POINT_OF_INITIATION: &str = "01";
const ID_MERCHANT_ACCOUNT: &str = "30";
const ID_MERCHANT_CATEGORY_CODE: &str = "52";
const ID_TRANSACTION_CURRENCY: &str = "53";
const ID_TRANSACTION_AMOUNT: &str = "54";
const ID_COUNTRY_CODE: &str = "58";
const ID_MERCHANT_NAME: &str = "59";
const ID_MERCHANT_CITY: &str = "60";
const ID_ADDITIONAL_DATA: &str = "62";

// Field length caps from the KHQR merchant profile
const MAX_MERCHANT_NAME: usize = 25;
const MAX_MERCHANT_CITY: usize = 15;
const MAX_ADDITIONAL_VALUE: usize = 25;

// ISO 4217 numeric code; Bakong merchant QRs here are denominated in USD
const CURRENCY_USD: &str = "840";

const CRC16_CCITT_FALSE: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0xFFFF,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0x29B1,
    residue: 0x0000,
};

/// Merchant identity stamped into every generated payload
#[derive(Debug, Clone)]
pub struct MerchantInfo {
    pub bakong_account_id: String,
    pub merchant_id: String,
    pub acquiring_bank: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub mobile_number: String,
    pub store_label: String,
    pub bill_number: Option<String>,
}

fn format_field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

fn truncated(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Build a dynamic merchant KHQR payload for the given amount.
pub fn build_merchant_qr(merchant: &MerchantInfo, amount: f64) -> BakongResult<String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BakongError::invalid_request(
            "amount must be a positive number",
            "amount",
        ));
    }
    if amount >= 1_000_000_000.0 {
        return Err(BakongError::invalid_request(
            "amount exceeds the supported range",
            "amount",
        ));
    }

    // ID 00: Payload Format Indicator
    let payload_format_indicator = format_field(ID_PAYLOAD_FORMAT, "01");

    // ID 01: Point of Initiation Method ("12" = dynamic, amount present)
    let point_of_initiation = format_field(ID_POINT_OF_INITIATION, "12");

    // ID 30: Merchant Account Information
    // sub 00 Bakong account id, sub 01 merchant id, sub 02 acquiring bank
    let account = format_field("00", &merchant.bakong_account_id);
    let merchant_id = format_field("01", &merchant.merchant_id);
    let bank = format_field("02", &merchant.acquiring_bank);
    let merchant_account = format_field(
        ID_MERCHANT_ACCOUNT,
        &format!("{}{}{}", account, merchant_id, bank),
    );

    // ID 52: Merchant Category Code
    let merchant_category_code = format_field(ID_MERCHANT_CATEGORY_CODE, "5999");

    // ID 53: Transaction Currency
    let transaction_currency = format_field(ID_TRANSACTION_CURRENCY, CURRENCY_USD);

    // ID 54: Transaction Amount
    let transaction_amount = format_field(ID_TRANSACTION_AMOUNT, &format!("{:.2}", amount));

    // ID 58: Country Code
    let country_code = format_field(ID_COUNTRY_CODE, "KH");

    // ID 59 / 60: Merchant Name and City
    let merchant_name = format_field(
        ID_MERCHANT_NAME,
        &truncated(&merchant.merchant_name, MAX_MERCHANT_NAME),
    );
    let merchant_city = format_field(
        ID_MERCHANT_CITY,
        &truncated(&merchant.merchant_city, MAX_MERCHANT_CITY),
    );

    // ID 62: Additional Data (01 bill number, 02 mobile number, 03 store label)
    let mut additional = String::new();
    if let Some(bill_number) = merchant.bill_number.as_deref() {
        if !bill_number.is_empty() {
            additional.push_str(&format_field(
                "01",
                &truncated(bill_number, MAX_ADDITIONAL_VALUE),
            ));
        }
    }
    if !merchant.mobile_number.is_empty() {
        additional.push_str(&format_field(
            "02",
            &truncated(&merchant.mobile_number, MAX_ADDITIONAL_VALUE),
        ));
    }
    if !merchant.store_label.is_empty() {
        additional.push_str(&format_field(
            "03",
            &truncated(&merchant.store_label, MAX_ADDITIONAL_VALUE),
        ));
    }
    let additional_data = if additional.is_empty() {
        String::new()
    } else {
        format_field(ID_ADDITIONAL_DATA, &additional)
    };

    let payload_without_crc = format!(
        "{}{}{}{}{}{}{}{}{}{}",
        payload_format_indicator,
        point_of_initiation,
        merchant_account,
        merchant_category_code,
        transaction_currency,
        transaction_amount,
        country_code,
        merchant_name,
        merchant_city,
        additional_data
    );

    // ID 63: CRC16 over the payload including its own "6304" prefix
    let crc_payload = format!("{}6304", payload_without_crc);
    let crc_value = Crc::<u16>::new(&CRC16_CCITT_FALSE).checksum(crc_payload.as_bytes());

    Ok(format!("{}{:04X}", crc_payload, crc_value))
}

/// MD5 fingerprint of a payload string; the Bakong status API is keyed by it.
pub fn fingerprint(payload: &str) -> String {
    format!("{:x}", md5::compute(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant() -> MerchantInfo {
        MerchantInfo {
            bakong_account_id: "coffee_shop@devb".to_string(),
            merchant_id: "123456".to_string(),
            acquiring_bank: "Dev Bank".to_string(),
            merchant_name: "Coffee Shop".to_string(),
            merchant_city: "PHNOM PENH".to_string(),
            mobile_number: "85512345678".to_string(),
            store_label: "Shop 1".to_string(),
            bill_number: Some("#12345".to_string()),
        }
    }

    #[test]
    fn crc_algorithm_matches_check_value() {
        // CRC-16/CCITT-FALSE of "123456789" is the algorithm's check constant
        let crc = Crc::<u16>::new(&CRC16_CCITT_FALSE);
        assert_eq!(crc.checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn payload_carries_static_emv_fields() {
        let payload = build_merchant_qr(&merchant(), 10.0).unwrap();

        assert!(payload.starts_with("000201"));
        assert!(payload.contains("010212"));
        assert!(payload.contains("5303840"));
        assert!(payload.contains("5802KH"));
        assert!(payload.contains("540510.00"));
        assert!(payload.contains("5911Coffee Shop"));
        assert!(payload.contains("6010PHNOM PENH"));
    }

    #[test]
    fn payload_crc_is_self_consistent() {
        let payload = build_merchant_qr(&merchant(), 1.50).unwrap();

        let (body, crc_hex) = payload.split_at(payload.len() - 4);
        assert!(body.ends_with("6304"));

        let crc = Crc::<u16>::new(&CRC16_CCITT_FALSE);
        let expected = format!("{:04X}", crc.checksum(body.as_bytes()));
        assert_eq!(crc_hex, expected);
    }

    #[test]
    fn amount_is_formatted_with_two_decimals() {
        let payload = build_merchant_qr(&merchant(), 7.0).unwrap();
        assert!(payload.contains("54047.00"));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(build_merchant_qr(&merchant(), 0.0).is_err());
        assert!(build_merchant_qr(&merchant(), -1.0).is_err());
        assert!(build_merchant_qr(&merchant(), f64::NAN).is_err());
        assert!(build_merchant_qr(&merchant(), f64::INFINITY).is_err());
    }

    #[test]
    fn long_merchant_fields_are_truncated_to_profile_caps() {
        let mut info = merchant();
        info.merchant_name = "An Extremely Long Merchant Name Beyond The Cap".to_string();
        let payload = build_merchant_qr(&info, 2.0).unwrap();

        // 25-char cap keeps the two-digit TLV length honest
        assert!(payload.contains("5925An Extremely Long Merchan"));
    }

    #[test]
    fn fingerprint_is_lowercase_hex_md5() {
        let md5 = fingerprint("00020101021230");
        assert_eq!(md5.len(), 32);
        assert!(md5.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn bill_number_lands_in_additional_data() {
        let payload = build_merchant_qr(&merchant(), 3.0).unwrap();
        assert!(payload.contains("0106#12345"));
        assert!(payload.contains("021185512345678"));
        assert!(payload.contains("0306Shop 1"));
    }
}
