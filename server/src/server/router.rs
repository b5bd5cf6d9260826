use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- QR code ---
        .route("/qrcode", get(api::qrcode::generate_qrcode))
        .route("/qrcode/download", get(api::qrcode::download_latest))
        .route("/qrcode/download/{id}", get(api::qrcode::download_by_id))
        // --- Middleware ---
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler(
    axum::extract::State(state): axum::extract::State<SharedState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "layout": state.config().layout.style.as_str(),
    }))
}
