//! Default values for all configuration settings.
//!
//! Component defaults are re-exported from the component modules so the
//! config file and the library cannot drift apart.

use std::path::PathBuf;

use super::settings::*;
use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

pub use crate::geolocation::{
    DEFAULT_REFINE_TIMEOUT_SECS, DEFAULT_SEED_TIMEOUT_SECS, DEFAULT_TARGET_ACCURACY_M,
};
pub use crate::map_view::{DEFAULT_MOBILE_BREAKPOINT_PX, DEFAULT_RESIZE_SETTLE_MS, DEFAULT_ZOOM};
pub use crate::routing::{DEFAULT_OSRM_BASE_URL, DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS};

/// Narrowest accepted mobile breakpoint.
pub const MIN_MOBILE_BREAKPOINT_PX: u32 = 320;

/// Highest tile zoom level accepted.
pub const MAX_ZOOM: u8 = 19;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            geolocation: GeolocationSettings {
                seed_timeout_secs: DEFAULT_SEED_TIMEOUT_SECS,
                refine_timeout_secs: DEFAULT_REFINE_TIMEOUT_SECS,
                target_accuracy_m: DEFAULT_TARGET_ACCURACY_M,
                high_accuracy: true,
            },
            routing: RoutingSettings {
                base_url: DEFAULT_OSRM_BASE_URL.to_string(),
                profile: DEFAULT_PROFILE.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            map: MapSettings {
                mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
                resize_settle_ms: DEFAULT_RESIZE_SETTLE_MS,
                default_zoom: DEFAULT_ZOOM,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
