pub mod bakong;

use crate::bakong::BakongService;
use axum::routing::post;
use axum::Router;
use bakong::BakongApiState;
use std::sync::Arc;

/// Build the Bakong API router.
///
/// Kept separate from `main` so tests can drive the exact same routes
/// against a service pointed at a stubbed upstream.
pub fn router(service: Arc<BakongService>) -> Router {
    Router::new()
        .route("/api/v1/bakong/generate-qr", post(bakong::generate_qr))
        .route("/api/v1/bakong/qr-image", post(bakong::get_qr_image))
        .route(
            "/api/v1/bakong/check-transaction",
            post(bakong::check_transaction),
        )
        .with_state(BakongApiState { service })
}
