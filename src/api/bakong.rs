//! Bakong API handlers: merchant QR generation, QR image rendering, and
//! transaction status checks.

use crate::bakong::types::{
    BakongStatusResponse, CheckTransactionRequest, GenerateQrRequest, GenerateQrResponse,
    QrImageRequest,
};
use crate::bakong::BakongService;
use crate::middleware::error::{error_response, get_request_id_from_headers, ErrorResponse};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

/// State for the Bakong API
#[derive(Clone)]
pub struct BakongApiState {
    pub service: Arc<BakongService>,
}

pub async fn generate_qr(
    State(state): State<BakongApiState>,
    headers: HeaderMap,
    Json(request): Json<GenerateQrRequest>,
) -> Result<Json<GenerateQrResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    state
        .service
        .generate_qr(&request)
        .map(Json)
        .map_err(|e| error_response(&e, request_id))
}

pub async fn get_qr_image(
    State(state): State<BakongApiState>,
    headers: HeaderMap,
    Json(request): Json<QrImageRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    let png = state
        .service
        .qr_image(&request)
        .map_err(|e| error_response(&e, request_id))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"qrcode.png\"",
            ),
        ],
        png,
    )
        .into_response())
}

pub async fn check_transaction(
    State(state): State<BakongApiState>,
    headers: HeaderMap,
    Json(request): Json<CheckTransactionRequest>,
) -> Result<Json<BakongStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    state
        .service
        .check_transaction(&request)
        .await
        .map(Json)
        .map_err(|e| error_response(&e, request_id))
}
