//! SmartQR API:
//!   GET /qrcode?data=…&label=…     – generate and preview
//!   GET /qrcode/download            – download the latest image
//!   GET /qrcode/download/{id}       – download a specific image

use axum::body::Body;
use axum::extract::{Path, RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use chrono::{DateTime, Utc};

use crate::app::SharedState;
use crate::services::qrcode::{QrService, is_valid_output_id, output_path};

use super::err_text;

type ApiResult = Result<Response, (StatusCode, String)>;

/// Filename suggested to browsers on download.
const DOWNLOAD_FILENAME: &str = "SmartQR.png";

/// Response header carrying the content id of a generated image.
pub const ID_HEADER: &str = "x-smartqr-id";

#[derive(Debug, Default)]
pub struct QrQuery {
    data: Option<String>,
    label: Option<String>,
}

impl QrQuery {
    /// Parse a raw query string. Repeated keys keep their first non-empty value.
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "data" => &mut query.data,
                "label" => &mut query.label,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, (StatusCode, String)> {
    value.ok_or_else(|| err_text(400, &format!("Missing '{name}' parameter")))
}

/// GET /qrcode
pub async fn generate_qrcode(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
) -> ApiResult {
    let query = QrQuery::parse(raw.as_deref().unwrap_or_default());
    let data = required(query.data, "data")?;
    let label = required(query.label, "label")?;

    let svc = QrService::new(state);
    let generated = tokio::task::spawn_blocking(move || svc.generate(&data, &label))
        .await
        .map_err(|e| {
            tracing::error!("QR generation task failed: {e}");
            err_text(500, "Failed to generate QR code")
        })?
        .map_err(|e| {
            tracing::error!("QR generation failed: {e}");
            err_text(500, e.public_message())
        })?;

    let mime = mime_guess::from_path(&generated.path).first_or_octet_stream();
    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(ID_HEADER, generated.id.as_str())
        .header(
            header::LOCATION,
            format!("/qrcode/download/{}", generated.id),
        )
        .body(Body::from(generated.png))
        .map_err(|e| err_text(500, &e.to_string()))
}

/// GET /qrcode/download
pub async fn download_latest(State(state): State<SharedState>) -> ApiResult {
    let Some(id) = state.latest_output() else {
        return Err(err_text(404, "No QR code has been generated yet"));
    };
    serve_download(&state, &id).await
}

/// GET /qrcode/download/{id}
pub async fn download_by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult {
    if !is_valid_output_id(&id) {
        return Err(err_text(400, "Invalid QR code id"));
    }
    serve_download(&state, &id).await
}

async fn serve_download(state: &SharedState, id: &str) -> ApiResult {
    let path = output_path(&state.config().output_dir, id);
    let data = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            err_text(404, "QR code not found")
        } else {
            tracing::error!(path = %path.display(), "Failed to read QR code image: {e}");
            err_text(500, "Failed to read QR code image")
        }
    })?;

    let mut resp = Response::builder()
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={DOWNLOAD_FILENAME}"),
        )
        .header(ID_HEADER, id);

    let modified = tokio::fs::metadata(&path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok());
    if let Some(modified) = modified {
        let dt: DateTime<Utc> = modified.into();
        resp = resp.header(
            header::LAST_MODIFIED,
            dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        );
    }

    resp.body(Body::from(data))
        .map_err(|e| err_text(500, &e.to_string()))
}
