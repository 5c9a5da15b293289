//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file, plus the
//! conversions into the component configs they feed.

use std::path::PathBuf;
use std::time::Duration;

use crate::geolocation::AcquisitionConfig;
use crate::map_view::MapConfig;
use crate::routing::RoutingConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Device location acquisition
    pub geolocation: GeolocationSettings,
    /// Routing provider
    pub routing: RoutingSettings,
    /// Map layout
    pub map: MapSettings,
    /// Log output
    pub logging: LoggingSettings,
}

/// Device location acquisition settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeolocationSettings {
    /// Bound on the initial coarse fix, in seconds.
    pub seed_timeout_secs: u64,
    /// Bound on the refinement watch, in seconds.
    pub refine_timeout_secs: u64,
    /// Accuracy radius at which refinement stops early, in meters.
    pub target_accuracy_m: f64,
    /// Ask the device for its most accurate positioning mode.
    pub high_accuracy: bool,
}

/// Routing provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingSettings {
    /// OSRM server base URL.
    pub base_url: String,
    /// OSRM profile.
    pub profile: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

/// Map layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    /// Viewports narrower than this use the mobile layout.
    pub mobile_breakpoint_px: u32,
    /// Delay before recomputing the viewport after showing the map.
    pub resize_settle_ms: u64,
    /// Zoom used when centering on a single point.
    pub default_zoom: u8,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log directory
    pub directory: PathBuf,
    /// Log file name within `directory`
    pub file: String,
}

impl ConfigFile {
    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            seed_timeout: Duration::from_secs(self.geolocation.seed_timeout_secs),
            refine_timeout: Duration::from_secs(self.geolocation.refine_timeout_secs),
            target_accuracy_m: self.geolocation.target_accuracy_m,
            high_accuracy: self.geolocation.high_accuracy,
        }
    }

    pub fn routing_config(&self) -> RoutingConfig {
        RoutingConfig {
            base_url: self.routing.base_url.clone(),
            profile: self.routing.profile.clone(),
            timeout: Duration::from_secs(self.routing.timeout_secs),
        }
    }

    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            mobile_breakpoint_px: self.map.mobile_breakpoint_px,
            resize_settle: Duration::from_millis(self.map.resize_settle_ms),
            default_zoom: self.map.default_zoom,
        }
    }
}
