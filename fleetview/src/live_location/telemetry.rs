//! Live telemetry snapshots supplied by the external tracking producer.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::coord::Coordinate;
use crate::vehicle::VehicleId;

/// Raw coordinate as the producer reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Telemetry payload exactly as the producer reports it (camelCase wire
/// names, unvalidated coordinates).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTelemetry {
    #[serde(default)]
    pub has_tracking_device: Option<bool>,
    #[serde(default)]
    pub live_location: Option<RawLocation>,
    #[serde(default)]
    pub initial_loading: bool,
    #[serde(default)]
    pub is_live: bool,
}

/// Validated live telemetry for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveTelemetryState {
    /// `None` until the producer has determined whether a device exists.
    pub has_tracking_device: Option<bool>,

    /// Most recent fix reported by the device, fresh or not.
    pub live_location: Option<Coordinate>,

    /// First poll still in flight.
    pub initial_loading: bool,

    /// The device is currently reporting.
    pub is_live: bool,
}

impl LiveTelemetryState {
    /// State for a vehicle with no producer attached.
    pub fn detached() -> Self {
        Self::default()
    }

    /// State while the first poll is in flight.
    pub fn loading() -> Self {
        Self {
            initial_loading: true,
            ..Self::default()
        }
    }

    /// A device that is reporting right now.
    pub fn live(location: Coordinate) -> Self {
        Self {
            has_tracking_device: Some(true),
            live_location: Some(location),
            initial_loading: false,
            is_live: true,
        }
    }

    /// A device whose last fix is no longer being refreshed.
    pub fn last_known(location: Coordinate) -> Self {
        Self {
            has_tracking_device: Some(true),
            live_location: Some(location),
            initial_loading: false,
            is_live: false,
        }
    }

    /// Validate a producer payload. A live location with a non-finite or
    /// out-of-range component is dropped as if none had been reported.
    pub fn from_raw(raw: &RawTelemetry) -> Self {
        let live_location = raw.live_location.and_then(|l| {
            let coord = Coordinate::new(l.latitude, l.longitude);
            if let Err(e) = &coord {
                trace!(error = %e, "Discarding invalid live location");
            }
            coord.ok()
        });

        Self {
            has_tracking_device: raw.has_tracking_device,
            live_location,
            initial_loading: raw.initial_loading,
            is_live: raw.is_live,
        }
    }
}

impl From<&RawTelemetry> for LiveTelemetryState {
    fn from(raw: &RawTelemetry) -> Self {
        Self::from_raw(raw)
    }
}

/// Read access to live telemetry keyed by vehicle.
///
/// Unknown vehicles read as [`LiveTelemetryState::detached`].
pub trait LiveTelemetrySource {
    fn telemetry(&self, vehicle_id: &str) -> LiveTelemetryState;
}

impl LiveTelemetrySource for HashMap<VehicleId, LiveTelemetryState> {
    fn telemetry(&self, vehicle_id: &str) -> LiveTelemetryState {
        self.get(vehicle_id).copied().unwrap_or_default()
    }
}

/// Shared telemetry snapshot store.
///
/// The external producer writes into the board as it polls; renderers read
/// from it. Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct TelemetryBoard {
    inner: Arc<DashMap<VehicleId, LiveTelemetryState>>,
}

impl TelemetryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for a vehicle.
    pub fn update(&self, vehicle_id: impl Into<VehicleId>, state: LiveTelemetryState) {
        self.inner.insert(vehicle_id.into(), state);
    }

    /// Validate and store a producer payload.
    pub fn apply_raw(&self, vehicle_id: impl Into<VehicleId>, raw: &RawTelemetry) {
        self.update(vehicle_id, LiveTelemetryState::from_raw(raw));
    }

    /// Forget a vehicle (producer detached).
    pub fn remove(&self, vehicle_id: &str) {
        self.inner.remove(vehicle_id);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl LiveTelemetrySource for TelemetryBoard {
    fn telemetry(&self, vehicle_id: &str) -> LiveTelemetryState {
        self.inner
            .get(vehicle_id)
            .map(|entry| *entry.value())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_valid() {
        let raw = RawTelemetry {
            has_tracking_device: Some(true),
            live_location: Some(RawLocation {
                latitude: 14.6,
                longitude: 121.0,
            }),
            initial_loading: false,
            is_live: true,
        };
        let state = LiveTelemetryState::from_raw(&raw);
        assert_eq!(state.live_location, Some(Coordinate::new(14.6, 121.0).unwrap()));
        assert!(state.is_live);
    }

    #[test]
    fn test_from_raw_drops_nan_location() {
        let raw = RawTelemetry {
            has_tracking_device: Some(true),
            live_location: Some(RawLocation {
                latitude: f64::NAN,
                longitude: 121.0,
            }),
            initial_loading: false,
            is_live: false,
        };
        let state = LiveTelemetryState::from_raw(&raw);
        assert!(state.live_location.is_none());
        assert_eq!(state.has_tracking_device, Some(true));
    }

    #[test]
    fn test_raw_deserialize_camel_case() {
        let json = r#"{
            "hasTrackingDevice": null,
            "liveLocation": {"latitude": 14.6, "longitude": 121.0},
            "initialLoading": false,
            "isLive": false
        }"#;
        let raw: RawTelemetry = serde_json::from_str(json).unwrap();
        assert_eq!(raw.has_tracking_device, None);
        assert!(raw.live_location.is_some());
    }

    #[test]
    fn test_raw_deserialize_defaults() {
        let raw: RawTelemetry = serde_json::from_str("{}").unwrap();
        assert_eq!(LiveTelemetryState::from_raw(&raw), LiveTelemetryState::detached());
    }

    #[test]
    fn test_board_unknown_vehicle_is_detached() {
        let board = TelemetryBoard::new();
        assert_eq!(board.telemetry("nope"), LiveTelemetryState::detached());
    }

    #[test]
    fn test_board_shared_between_clones() {
        let board = TelemetryBoard::new();
        let producer = board.clone();

        producer.update("v1", LiveTelemetryState::loading());
        assert_eq!(board.telemetry("v1"), LiveTelemetryState::loading());
        assert_eq!(board.len(), 1);

        producer.remove("v1");
        assert!(board.is_empty());
    }

    #[test]
    fn test_hashmap_source() {
        let mut map = HashMap::new();
        let fix = Coordinate::new(14.6, 121.0).unwrap();
        map.insert("v1".to_string(), LiveTelemetryState::live(fix));

        assert!(map.telemetry("v1").is_live);
        assert!(!map.telemetry("v2").is_live);
    }
}
