//! Geographic coordinate module
//!
//! Provides the validated [`Coordinate`] and [`AccuracyRadius`] types shared by
//! every component. Raw latitude/longitude values coming from a device, the
//! live telemetry producer or the routing provider are checked here before
//! they can enter any state.

mod types;

pub use types::{
    AccuracyRadius, CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Used for display only ("vehicle is 1.2 km away"); route selection never
/// depends on it.
#[inline]
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
