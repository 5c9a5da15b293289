//! Fusion of garage and live coordinates into the drawable vehicle set.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use super::telemetry::{LiveTelemetrySource, LiveTelemetryState};
use crate::coord::Coordinate;
use crate::vehicle::{Vehicle, VehicleId};

/// Where a view's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOrigin {
    /// The tracking device's most recent fix.
    LiveTelemetry,
    /// The owner-declared garage location.
    Garage,
    /// Neither is available; the vehicle cannot be placed on the map.
    Unplaced,
}

/// Placement of one vehicle on the map.
///
/// Holds only what decides where the marker goes. Display fields (make,
/// model, plate) are read from the caller's current vehicle list so a
/// memoized view never carries stale ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleView {
    pub vehicle_id: VehicleId,

    /// Coordinate to draw the marker at.
    pub position: Option<Coordinate>,

    /// Garage coordinate, kept even when shadowed by a live fix.
    pub garage: Option<Coordinate>,

    pub origin: ViewOrigin,
}

impl VehicleView {
    pub fn id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }
}

/// Overlay a vehicle's live telemetry onto its garage location.
pub fn fuse_vehicle(vehicle: &Vehicle, telemetry: &LiveTelemetryState) -> VehicleView {
    let garage = vehicle.garage_coordinate();
    let (position, origin) = match (telemetry.live_location, garage) {
        (Some(live), _) => (Some(live), ViewOrigin::LiveTelemetry),
        (None, Some(garage)) => (Some(garage), ViewOrigin::Garage),
        (None, None) => (None, ViewOrigin::Unplaced),
    };

    VehicleView {
        vehicle_id: vehicle.id.clone(),
        position,
        garage,
        origin,
    }
}

/// Inputs that decide whether the derived set must be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    id: VehicleId,
    garage: Option<(u64, u64)>,
    live: Option<(u64, u64)>,
}

impl MemoKey {
    fn of(vehicle: &Vehicle, telemetry: &LiveTelemetryState) -> Self {
        Self {
            id: vehicle.id.clone(),
            garage: vehicle.garage_coordinate().map(|c| c.key()),
            live: telemetry.live_location.map(|c| c.key()),
        }
    }
}

/// Memoized derivation of the drawable vehicle set.
///
/// The set is rebuilt only when vehicle identity or a coordinate changes
/// numerically. Display-only edits and live or loading flag changes hand
/// back the previous `Arc`, so a map keyed on it is not re-created. The
/// views hold no display fields, so reuse never serves stale ones.
#[derive(Debug, Default)]
pub struct LiveVehicleMemo {
    key: Option<Vec<MemoKey>>,
    views: Option<Arc<[VehicleView]>>,
    rebuilds: u64,
}

impl LiveVehicleMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the drawable set for `vehicles`, reusing the last result when
    /// nothing that affects placement changed.
    pub fn derive<S>(&mut self, vehicles: &[Vehicle], telemetry: &S) -> Arc<[VehicleView]>
    where
        S: LiveTelemetrySource + ?Sized,
    {
        let snapshots: Vec<LiveTelemetryState> = vehicles
            .iter()
            .map(|v| telemetry.telemetry(&v.id))
            .collect();
        self.derive_from(vehicles, &snapshots)
    }

    /// Like [`derive`](Self::derive), over telemetry snapshots the caller
    /// already read, one per vehicle in order.
    ///
    /// Lets a caller classify from the same snapshots it placed from.
    pub fn derive_from(
        &mut self,
        vehicles: &[Vehicle],
        snapshots: &[LiveTelemetryState],
    ) -> Arc<[VehicleView]> {
        debug_assert_eq!(vehicles.len(), snapshots.len());
        let key: Vec<MemoKey> = vehicles
            .iter()
            .zip(snapshots)
            .map(|(v, t)| MemoKey::of(v, t))
            .collect();

        if let (Some(prev), Some(views)) = (&self.key, &self.views) {
            if *prev == key {
                return Arc::clone(views);
            }
        }

        let views: Arc<[VehicleView]> = vehicles
            .iter()
            .zip(snapshots)
            .map(|(v, t)| fuse_vehicle(v, t))
            .collect();

        self.rebuilds += 1;
        trace!(
            vehicles = views.len(),
            rebuilds = self.rebuilds,
            "Rebuilt drawable vehicle set"
        );

        self.key = Some(key);
        self.views = Some(Arc::clone(&views));
        views
    }

    /// Number of times the set has been rebuilt.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Drop the cached set.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.views = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_location::{classify, DisplayStatus, TelemetryBoard};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_live_shadows_garage() {
        let v = Vehicle::new("v1", 14.55, 121.02);
        let t = LiveTelemetryState::live(coord(14.6, 121.0));

        let view = fuse_vehicle(&v, &t);
        assert_eq!(view.position, Some(coord(14.6, 121.0)));
        assert_eq!(view.garage, Some(coord(14.55, 121.02)));
        assert_eq!(view.origin, ViewOrigin::LiveTelemetry);
    }

    #[test]
    fn test_last_known_position_used() {
        let v = Vehicle::new("v1", 14.55, 121.02);
        let t = LiveTelemetryState::last_known(coord(14.6, 121.0));

        let view = fuse_vehicle(&v, &t);
        assert_eq!(classify(&t), DisplayStatus::LastKnown);
        assert_eq!(view.position, Some(coord(14.6, 121.0)));
    }

    #[test]
    fn test_garage_fallback() {
        let v = Vehicle::new("v1", 14.55, 121.02);
        let view = fuse_vehicle(&v, &LiveTelemetryState::detached());
        assert_eq!(view.position, Some(coord(14.55, 121.02)));
        assert_eq!(view.origin, ViewOrigin::Garage);
    }

    #[test]
    fn test_unplaced_without_any_coordinate() {
        let v = Vehicle::without_garage("v1");
        let view = fuse_vehicle(&v, &LiveTelemetryState::detached());
        assert!(!view.is_placed());
        assert_eq!(view.origin, ViewOrigin::Unplaced);
    }

    #[test]
    fn test_live_without_garage() {
        let v = Vehicle::without_garage("v1");
        let view = fuse_vehicle(&v, &LiveTelemetryState::live(coord(1.0, 2.0)));
        assert_eq!(view.position, Some(coord(1.0, 2.0)));
        assert!(view.garage.is_none());
    }

    #[test]
    fn test_memo_reuses_when_unchanged() {
        let board = TelemetryBoard::new();
        board.update("v1", LiveTelemetryState::live(coord(14.6, 121.0)));
        let vehicles = vec![Vehicle::new("v1", 14.55, 121.02)];

        let mut memo = LiveVehicleMemo::new();
        let a = memo.derive(&vehicles, &board);
        let b = memo.derive(&vehicles, &board);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(memo.rebuilds(), 1);
    }

    #[test]
    fn test_memo_ignores_display_fields_and_flags() {
        let board = TelemetryBoard::new();
        board.update("v1", LiveTelemetryState::live(coord(14.6, 121.0)));
        let mut vehicles = vec![Vehicle::new("v1", 14.55, 121.02)];

        let mut memo = LiveVehicleMemo::new();
        let a = memo.derive(&vehicles, &board);

        vehicles[0].make = Some("Toyota".to_string());
        board.update("v1", LiveTelemetryState::last_known(coord(14.6, 121.0)));
        let b = memo.derive(&vehicles, &board);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b[0].id(), "v1");
    }

    #[test]
    fn test_derive_from_uses_given_snapshots() {
        let vehicles = vec![
            Vehicle::new("v1", 14.55, 121.02),
            Vehicle::without_garage("v2"),
        ];
        let snapshots = vec![
            LiveTelemetryState::detached(),
            LiveTelemetryState::live(coord(14.7, 121.1)),
        ];

        let mut memo = LiveVehicleMemo::new();
        let views = memo.derive_from(&vehicles, &snapshots);

        assert_eq!(views[0].origin, ViewOrigin::Garage);
        assert_eq!(views[1].origin, ViewOrigin::LiveTelemetry);
        assert_eq!(views[1].position, Some(coord(14.7, 121.1)));
    }

    #[test]
    fn test_memo_rebuilds_on_coordinate_change() {
        let board = TelemetryBoard::new();
        board.update("v1", LiveTelemetryState::live(coord(14.6, 121.0)));
        let vehicles = vec![Vehicle::new("v1", 14.55, 121.02)];

        let mut memo = LiveVehicleMemo::new();
        let a = memo.derive(&vehicles, &board);

        board.update("v1", LiveTelemetryState::live(coord(14.6001, 121.0)));
        let b = memo.derive(&vehicles, &board);

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b[0].position, Some(coord(14.6001, 121.0)));
        assert_eq!(memo.rebuilds(), 2);
    }

    #[test]
    fn test_memo_rebuilds_on_vehicle_set_change() {
        let board = TelemetryBoard::new();
        let mut vehicles = vec![Vehicle::new("v1", 14.55, 121.02)];

        let mut memo = LiveVehicleMemo::new();
        let a = memo.derive(&vehicles, &board);

        vehicles.push(Vehicle::new("v2", 14.5, 121.1));
        let b = memo.derive(&vehicles, &board);

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_memo_invalidate() {
        let board = TelemetryBoard::new();
        let vehicles = vec![Vehicle::new("v1", 14.55, 121.02)];

        let mut memo = LiveVehicleMemo::new();
        let a = memo.derive(&vehicles, &board);
        memo.invalidate();
        let b = memo.derive(&vehicles, &board);

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }
}
