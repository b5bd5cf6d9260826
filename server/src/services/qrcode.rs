//! SmartQR generation service: assets in, content-addressed PNG out.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use image_engine::{EngineError, LayoutConfig, compose_smart_qr, encode_png, parse_font};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::app::SharedState;
use crate::config::OutputRetention;

use super::assets::AssetError;

static RE_OUTPUT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{64}$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum QrServiceError {
    #[error("logo: {0}")]
    Logo(#[source] AssetError),
    #[error("font: {0}")]
    Font(#[source] AssetError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QrServiceError {
    /// Message safe to show to HTTP clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Logo(AssetError::Read { .. }) => "Failed to open logo file",
            Self::Logo(AssetError::Decode(_)) => "Failed to decode logo image",
            Self::Font(_) => "Failed to load font file",
            Self::Engine(EngineError::FontParse(_)) => "Failed to parse font",
            Self::Engine(EngineError::QrEncode(_)) => "Failed to generate QR code",
            Self::Engine(EngineError::LogoDecode(_)) => "Failed to decode logo image",
            Self::Engine(EngineError::Encode(_)) => "Failed to encode QR code image",
            Self::CreateDir { .. } => "Failed to create temporary directory",
            Self::Write { .. } => "Failed to save QR code image",
        }
    }
}

/// A generated image persisted under its content id.
#[derive(Debug, Clone)]
pub struct GeneratedQr {
    pub id: String,
    pub path: PathBuf,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone)]
pub struct QrService {
    state: SharedState,
}

impl QrService {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Compose, encode and persist one SmartQR image.
    ///
    /// CPU-bound and blocking; call from `spawn_blocking`.
    pub fn generate(&self, data: &str, label: &str) -> Result<GeneratedQr, QrServiceError> {
        let config = self.state.config();
        let assets = self.state.assets();

        let logo = assets.logo(&config.logo_path).map_err(QrServiceError::Logo)?;
        let font_bytes = assets
            .font_bytes(&config.font_path)
            .map_err(QrServiceError::Font)?;
        let font = parse_font(&font_bytes)?;

        let composed = compose_smart_qr(data, label, &logo, &font, &config.layout)?;
        if let Some(issue) = &composed.label_issue {
            tracing::warn!(label, "Failed to draw label cleanly: {issue}");
        }

        let png = encode_png(&composed.image)?;
        let id = output_id(data, label, &config.layout);
        let path = self.state.publish_output(&id, || {
            let path = write_output(&config.output_dir, &id, &png)?;
            match prune_outputs(&config.output_dir, &config.retention, Some(id.as_str())) {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, "Old QR codes cleaned up"),
                Err(e) => tracing::warn!("Failed to clean up output directory: {e}"),
            }
            Ok::<_, QrServiceError>(path)
        })?;

        tracing::info!(
            id = %id,
            width = composed.image.width(),
            height = composed.image.height(),
            "QR code generated"
        );

        Ok(GeneratedQr {
            id,
            path,
            png,
            width: composed.image.width(),
            height: composed.image.height(),
        })
    }
}

/// Content id of a request: SHA-256 over length-prefixed inputs.
pub fn output_id(data: &str, label: &str, layout: &LayoutConfig) -> String {
    let mut hasher = Sha256::new();
    for part in [data, label, layout.fingerprint().as_str()] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

pub fn is_valid_output_id(id: &str) -> bool {
    RE_OUTPUT_ID.is_match(id)
}

pub fn output_path(output_dir: &Path, id: &str) -> PathBuf {
    output_dir.join(format!("{id}.png"))
}

/// Create the output directory if needed, world-readable on Unix.
pub fn ensure_output_dir(dir: &Path) -> Result<(), QrServiceError> {
    let create_err = |source| QrServiceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    };
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(create_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))
            .map_err(create_err)?;
    }

    tracing::info!(dir = %dir.display(), "Created output directory");
    Ok(())
}

/// Atomically replace `<dir>/<id>.png` with `png`.
///
/// The bytes go to a uniquely named sibling first and are renamed into
/// place, so concurrent readers see either the old or the new file.
pub fn write_output(dir: &Path, id: &str, png: &[u8]) -> Result<PathBuf, QrServiceError> {
    ensure_output_dir(dir)?;

    let path = output_path(dir, id);
    let tmp_path = dir.join(format!("{id}.png.tmp-{}", uuid::Uuid::new_v4()));
    let write_err = |source| QrServiceError::Write {
        path: path.clone(),
        source,
    };

    let result = std::fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(png)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&tmp_path, &path));

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }
    Ok(path)
}

/// Delete generated images beyond the retention limits, oldest first.
///
/// `keep` is never deleted. Only `<id>.png` files are considered.
pub fn prune_outputs(
    dir: &Path,
    retention: &OutputRetention,
    keep: Option<&str>,
) -> std::io::Result<u64> {
    if *retention == OutputRetention::UNLIMITED {
        return Ok(0);
    }

    let mut outputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(id) = file_name.to_str().and_then(|n| n.strip_suffix(".png")) else {
            continue;
        };
        if !is_valid_output_id(id) || Some(id) == keep {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        outputs.push((modified, entry.path()));
    }

    // Newest first
    outputs.sort_by(|a, b| b.cmp(a));

    let now = SystemTime::now();
    let budget = retention
        .max_files
        .saturating_sub(usize::from(keep.is_some()));
    let mut deleted = 0u64;
    for (index, (modified, path)) in outputs.iter().enumerate() {
        let over_count = retention.max_files > 0 && index >= budget;
        let expired = retention
            .max_age
            .zip(now.duration_since(*modified).ok())
            .is_some_and(|(max_age, age)| age > max_age);
        if over_count || expired {
            match std::fs::remove_file(path) {
                Ok(()) => deleted += 1,
                Err(e) => tracing::warn!(path = %path.display(), "Failed to delete old QR code: {e}"),
            }
        }
    }
    Ok(deleted)
}
