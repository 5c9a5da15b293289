//! Live Location Fusion & Classifier
//!
//! Decides where to draw a rented vehicle and which short status label to
//! show next to it, from the vehicle's static garage location and the
//! externally polled live telemetry snapshot.
//!
//! # Fusion
//!
//! A live coordinate, when present, *shadows* the garage coordinate; the
//! garage location is never discarded and remains the fallback of record.
//!
//! # Classification
//!
//! Evaluated top to bottom, first match wins:
//!
//! | Condition                                   | Status             |
//! |---------------------------------------------|--------------------|
//! | initial load in progress                    | `Loading`          |
//! | feed is live                                | `Live`             |
//! | has a fix, feed not live                    | `LastKnown`        |
//! | tracking device confirmed, no fix yet       | `WaitingForDevice` |
//! | anything else (incl. device "not yet known")| `GarageFallback`   |
//!
//! # Components
//!
//! - [`telemetry`] - `LiveTelemetryState`, `RawTelemetry`, `TelemetryBoard`
//! - [`status`] - `DisplayStatus` and `classify`
//! - [`fusion`] - `VehicleView`, `fuse_vehicle`, `LiveVehicleMemo`

mod fusion;
mod status;
mod telemetry;

pub use fusion::{fuse_vehicle, LiveVehicleMemo, VehicleView, ViewOrigin};
pub use status::{classify, DisplayStatus};
pub use telemetry::{LiveTelemetrySource, LiveTelemetryState, RawLocation, RawTelemetry, TelemetryBoard};
