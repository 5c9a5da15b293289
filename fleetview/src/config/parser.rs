//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::{MAX_ZOOM, MIN_MOBILE_BREAKPOINT_PX};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [geolocation] section
    if let Some(section) = ini.section(Some("geolocation")) {
        if let Some(v) = section.get("seed_timeout_secs") {
            config.geolocation.seed_timeout_secs = parse_positive(
                "geolocation",
                "seed_timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("refine_timeout_secs") {
            config.geolocation.refine_timeout_secs = parse_positive(
                "geolocation",
                "refine_timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("target_accuracy_m") {
            let meters: f64 = parse_value("geolocation", "target_accuracy_m", v, "must be a number")?;
            if !meters.is_finite() || meters <= 0.0 {
                return Err(invalid(
                    "geolocation",
                    "target_accuracy_m",
                    v,
                    "must be a positive number of meters",
                ));
            }
            config.geolocation.target_accuracy_m = meters;
        }
        if let Some(v) = section.get("high_accuracy") {
            config.geolocation.high_accuracy = parse_bool(v);
        }
    }

    // [routing] section
    if let Some(section) = ini.section(Some("routing")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid(
                    "routing",
                    "base_url",
                    v,
                    "must start with http:// or https://",
                ));
            }
            config.routing.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = section.get("profile") {
            let v = v.trim();
            if v.is_empty() || v.contains('/') {
                return Err(invalid(
                    "routing",
                    "profile",
                    v,
                    "must be a non-empty profile name such as 'driving'",
                ));
            }
            config.routing.profile = v.to_string();
        }
        if let Some(v) = section.get("timeout_secs") {
            config.routing.timeout_secs = parse_positive(
                "routing",
                "timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("mobile_breakpoint_px") {
            let px: u32 = parse_value("map", "mobile_breakpoint_px", v, "must be an integer (pixels)")?;
            if px < MIN_MOBILE_BREAKPOINT_PX {
                return Err(invalid(
                    "map",
                    "mobile_breakpoint_px",
                    v,
                    &format!("must be at least {}", MIN_MOBILE_BREAKPOINT_PX),
                ));
            }
            config.map.mobile_breakpoint_px = px;
        }
        if let Some(v) = section.get("resize_settle_ms") {
            config.map.resize_settle_ms =
                parse_value("map", "resize_settle_ms", v, "must be an integer (milliseconds)")?;
        }
        if let Some(v) = section.get("default_zoom") {
            let zoom: u8 = parse_value("map", "default_zoom", v, "must be an integer zoom level")?;
            if zoom > MAX_ZOOM {
                return Err(invalid(
                    "map",
                    "default_zoom",
                    v,
                    &format!("must be between 0 and {}", MAX_ZOOM),
                ));
            }
            config.map.default_zoom = zoom;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<u64, ConfigFileError> {
    match parse_value::<u64>(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        n => Ok(n),
    }
}

/// Parse a boolean from common truthy spellings. Anything else is false.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
