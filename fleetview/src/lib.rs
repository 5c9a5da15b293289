//! FleetView - real-time location core for a vehicle rental platform
//!
//! This library answers three questions for a rental client: where is the
//! user, where is the vehicle, and how does the user get there.
//!
//! - [`geolocation`] - acquires the user's position, progressively refining
//!   a coarse fix toward a target accuracy
//! - [`live_location`] - overlays live tracking telemetry on a vehicle's
//!   garage location and classifies how current it is
//! - [`routing`] - computes a driving route to the first candidate vehicle
//! - [`map_view`] - chooses the map surface for the layout and assembles
//!   what the map draws
//!
//! # Example
//!
//! ```ignore
//! use fleetview::config::ConfigFile;
//! use fleetview::geolocation::GeolocationEngine;
//! use fleetview::routing::{OsrmClient, RouteAdapter};
//!
//! let config = ConfigFile::load()?;
//! let engine = GeolocationEngine::new(device, config.acquisition_config());
//! engine.toggle();
//!
//! let router = RouteAdapter::new(Arc::new(OsrmClient::new(config.routing_config())?));
//! router.update(engine.coords(), &vehicles);
//! ```

pub mod config;
pub mod coord;
pub mod geolocation;
pub mod live_location;
pub mod logging;
pub mod map_view;
pub mod routing;
pub mod vehicle;

/// Version of the FleetView library and CLI.
///
/// Synchronized across the workspace and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
