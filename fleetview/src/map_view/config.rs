//! Configuration for map composition.

use std::time::Duration;

/// Viewports narrower than this use the mobile layout.
pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 1024;

/// Delay between a switch to the map and the viewport recompute.
pub const DEFAULT_RESIZE_SETTLE_MS: u64 = 100;

/// Zoom a host uses when centering on a single point.
pub const DEFAULT_ZOOM: u8 = 13;

/// Map composition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    pub mobile_breakpoint_px: u32,
    pub resize_settle: Duration,
    pub default_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            resize_settle: Duration::from_millis(DEFAULT_RESIZE_SETTLE_MS),
            default_zoom: DEFAULT_ZOOM,
        }
    }
}
