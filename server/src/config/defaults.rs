//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", "HTTP listen port"),
    ("SMARTQR_LAYOUT", "banner", "Label layout: 'plain' (256px) or 'banner' (1024px)"),
    ("SMARTQR_LABEL_ALIGN", "measured", "Label placement: 'measured' or 'char-count'"),
    ("SMARTQR_LOGO_PATH", "smartlink-logo.png", "Logo image placed in the center of the code"),
    ("SMARTQR_FONT_PATH", "Roboto-Medium.ttf", "TrueType/OpenType font for the label"),
    ("SMARTQR_OUTPUT_DIR", "temp", "Directory receiving generated images"),
    ("SMARTQR_OUTPUT_MAX_FILES", "200", "Generated images kept on disk (0 = unlimited)"),
    ("SMARTQR_OUTPUT_MAX_AGE_HOURS", "168", "Age after which generated images are deleted (0 = never)"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
