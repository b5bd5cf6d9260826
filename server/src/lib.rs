pub mod app;
pub mod config;
pub mod server;
pub mod services;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and the runtime configuration.
pub fn init_foundation() -> AppConfig {
    load_dotenv();

    let config = AppConfig::load();

    for (name, path) in [("logo", &config.logo_path), ("font", &config.font_path)] {
        if !path.is_file() {
            tracing::warn!(
                asset = name,
                path = %path.display(),
                "Asset not found; /qrcode will fail until it exists"
            );
        }
    }

    tracing::info!(
        port = config.server_port,
        layout = config.layout.style.as_str(),
        align = config.layout.align.as_str(),
        output_dir = %config.output_dir.display(),
        max_files = config.retention.max_files,
        "Settings loaded"
    );

    if config.output_dir.is_dir() {
        match services::qrcode::prune_outputs(&config.output_dir, &config.retention, None) {
            Ok(deleted) => tracing::info!(deleted, "Output directory cleaned up on start"),
            Err(e) => tracing::warn!("Failed to clean up output directory: {e}"),
        }
    }
    config
}
