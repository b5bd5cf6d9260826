//! Runtime application configuration loaded from defaults + environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use image_engine::{LabelAlign, LayoutConfig};

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub layout: LayoutConfig,
    pub logo_path: PathBuf,
    pub font_path: PathBuf,
    pub output_dir: PathBuf,
    pub retention: OutputRetention,
}

/// Limits applied to the output directory after each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRetention {
    /// Newest images to keep; `0` disables the count limit.
    pub max_files: usize,
    /// Images older than this are deleted; `None` keeps them forever.
    pub max_age: Option<Duration>,
}

impl OutputRetention {
    pub const UNLIMITED: Self = Self {
        max_files: 0,
        max_age: None,
    };
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup, falling back to defaults.
    ///
    /// Values that fail validation are logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> String {
            let default = get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(value) => match validate_setting(key, &value) {
                    Ok(()) => value,
                    Err(e) => {
                        tracing::warn!(key, value = %value, "Invalid setting ({e}), using default");
                        default.to_string()
                    }
                },
                None => default.to_string(),
            }
        };

        let layout = match g("SMARTQR_LAYOUT").as_str() {
            "plain" => LayoutConfig::plain(),
            _ => LayoutConfig::banner(),
        };
        let align = match g("SMARTQR_LABEL_ALIGN").as_str() {
            "char-count" => LabelAlign::CharCount,
            _ => LabelAlign::Measured,
        };

        let max_age_hours: u64 = g("SMARTQR_OUTPUT_MAX_AGE_HOURS").parse().unwrap_or(168);
        let retention = OutputRetention {
            max_files: g("SMARTQR_OUTPUT_MAX_FILES").parse().unwrap_or(200),
            max_age: (max_age_hours > 0).then(|| Duration::from_secs(max_age_hours * 3600)),
        };

        Self {
            server_port: g("SERVER_PORT").parse().unwrap_or(8080),
            layout: layout.with_align(align),
            logo_path: PathBuf::from(g("SMARTQR_LOGO_PATH")),
            font_path: PathBuf::from(g("SMARTQR_FONT_PATH")),
            output_dir: PathBuf::from(g("SMARTQR_OUTPUT_DIR")),
            retention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_engine::LabelStyle;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_banner_service() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.layout, LayoutConfig::banner());
        assert_eq!(config.logo_path, PathBuf::from("smartlink-logo.png"));
        assert_eq!(config.font_path, PathBuf::from("Roboto-Medium.ttf"));
        assert_eq!(config.output_dir, PathBuf::from("temp"));
        assert_eq!(config.retention.max_files, 200);
        assert_eq!(config.retention.max_age, Some(Duration::from_secs(168 * 3600)));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("SERVER_PORT", "9090"),
            ("SMARTQR_LAYOUT", "plain"),
            ("SMARTQR_LABEL_ALIGN", "char-count"),
            ("SMARTQR_OUTPUT_DIR", "/tmp/qr"),
        ]);
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.layout.style, LabelStyle::Plain);
        assert_eq!(config.layout.qr_size, 256);
        assert_eq!(config.layout.align, LabelAlign::CharCount);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/qr"));
    }

    #[test]
    fn zero_retention_limits_disable_pruning() {
        let config = config_from(&[
            ("SMARTQR_OUTPUT_MAX_FILES", "0"),
            ("SMARTQR_OUTPUT_MAX_AGE_HOURS", "0"),
        ]);
        assert_eq!(config.retention, OutputRetention::UNLIMITED);

        let config = config_from(&[("SMARTQR_OUTPUT_MAX_FILES", "lots")]);
        assert_eq!(config.retention.max_files, 200);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[("SERVER_PORT", "0"), ("SMARTQR_LAYOUT", "huge")]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.layout.style, LabelStyle::Banner);
    }
}
