//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => {
            let v: u16 = value.parse().map_err(|_| "must be an integer between 1 and 65535")?;
            if v == 0 {
                return Err("must be an integer between 1 and 65535".into());
            }
        }
        "SMARTQR_LAYOUT" => {
            if value != "plain" && value != "banner" {
                return Err("must be 'plain' or 'banner'".into());
            }
        }
        "SMARTQR_LABEL_ALIGN" => {
            if value != "measured" && value != "char-count" {
                return Err("must be 'measured' or 'char-count'".into());
            }
        }
        "SMARTQR_LOGO_PATH" | "SMARTQR_FONT_PATH" | "SMARTQR_OUTPUT_DIR" => {
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        "SMARTQR_OUTPUT_MAX_FILES" | "SMARTQR_OUTPUT_MAX_AGE_HOURS" => {
            value
                .parse::<u32>()
                .map_err(|_| "must be a non-negative integer")?;
        }
        _ => return Err(format!("unknown setting key: {key}")),
    }
    Ok(())
}
