//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[geolocation]
; Seconds to wait for the first, possibly coarse, fix (default: 10)
seed_timeout_secs = {}
; Seconds to keep refining before accepting the best fix so far (default: 15)
refine_timeout_secs = {}
; Stop refining once a fix is this accurate, in meters (default: 20)
target_accuracy_m = {}
; Ask the device for GPS-grade accuracy (default: true)
high_accuracy = {}

[routing]
; OSRM server used for driving directions
; The public demo server is rate limited; point this at your own for production
base_url = {}
; OSRM profile (default: driving)
profile = {}
; HTTP timeout in seconds (default: 10)
timeout_secs = {}

[map]
; Viewports narrower than this many pixels use the mobile list/map toggle (default: 1024)
mobile_breakpoint_px = {}
; Milliseconds to wait after showing the map before re-measuring it (default: 100)
resize_settle_ms = {}
; Zoom level when centering on a single point, 0-19 (default: 13)
default_zoom = {}

[logging]
; Log directory, relative paths are resolved from the working directory (default: logs)
directory = {}
; Log file name, truncated on every run (default: fleetview.log)
file = {}
"#,
        config.geolocation.seed_timeout_secs,
        config.geolocation.refine_timeout_secs,
        config.geolocation.target_accuracy_m,
        config.geolocation.high_accuracy,
        config.routing.base_url,
        config.routing.profile,
        config.routing.timeout_secs,
        config.map.mobile_breakpoint_px,
        config.map.resize_settle_ms,
        config.map.default_zoom,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
