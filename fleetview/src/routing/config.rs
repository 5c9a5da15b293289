//! Configuration for the routing provider.

use std::time::Duration;

/// Public OSRM demo server.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default HTTP timeout for a route request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Routing provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Base URL of the OSRM server, without a trailing slash.
    pub base_url: String,

    /// OSRM profile segment ("driving", "car", ...).
    pub profile: String,

    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
