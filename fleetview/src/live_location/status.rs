//! Staleness classification of a vehicle's displayed location.

use std::fmt;

use serde::Serialize;

use super::telemetry::LiveTelemetryState;

/// How current the displayed location is.
///
/// Derived from a telemetry snapshot on every render; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// First telemetry poll still in flight.
    Loading,
    /// Device reporting right now.
    Live,
    /// A previous fix that is no longer refreshed.
    LastKnown,
    /// Device is installed but has not reported yet.
    WaitingForDevice,
    /// Showing the owner-declared garage location.
    GarageFallback,
}

impl DisplayStatus {
    /// Short label shown next to the map.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "Loading location...",
            Self::Live => "Live location",
            Self::LastKnown => "Last known location",
            Self::WaitingForDevice => "Waiting for device...",
            Self::GarageFallback => "Garage location",
        }
    }

    /// Whether the displayed coordinate comes from the tracking device.
    pub fn is_device_position(&self) -> bool {
        matches!(self, Self::Live | Self::LastKnown)
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a telemetry snapshot. First match wins.
pub fn classify(telemetry: &LiveTelemetryState) -> DisplayStatus {
    if telemetry.initial_loading {
        return DisplayStatus::Loading;
    }
    if telemetry.is_live {
        return DisplayStatus::Live;
    }
    if telemetry.live_location.is_some() {
        return DisplayStatus::LastKnown;
    }
    // `None` (not yet determined) must not read as a confirmed device
    if telemetry.has_tracking_device == Some(true) {
        return DisplayStatus::WaitingForDevice;
    }
    DisplayStatus::GarageFallback
}
