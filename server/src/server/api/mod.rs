//! HTTP API handlers grouped by domain.

pub mod qrcode;

use axum::http::StatusCode;

/// Plain-text error response.
pub fn err_text(status: u16, message: &str) -> (StatusCode, String) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message.to_string(),
    )
}
