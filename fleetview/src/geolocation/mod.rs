//! Geolocation Acquisition Engine
//!
//! Produces the most accurate position obtainable for the end user's device
//! within a bounded time budget, under explicit user control (toggle on/off).
//!
//! # Two-phase acquisition
//!
//! - **Seed** → one best-effort fix (no cached result, bounded wait) so the
//!   map has *something* to show quickly. Failure is non-fatal.
//! - **Refinement** → a continuous watch. Only strictly more accurate fixes
//!   replace the published one. Ends on the first fix at or below the target
//!   accuracy, or when the refinement timeout elapses; the watch is cancelled
//!   on either path.
//!
//! Every reading is validated at the boundary; a non-finite latitude or
//! longitude never reaches published state.
//!
//! # Sessions
//!
//! Each toggle-on creates an independent session tagged with a generation
//! number. Disabling bumps the generation, so anything a torn-down session
//! still tries to publish is dropped.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetview::geolocation::{AcquisitionConfig, GeolocationEngine, ReplayCapability};
//!
//! let capability = Arc::new(ReplayCapability::from_json_file("track.json")?);
//! let engine = GeolocationEngine::new(capability, AcquisitionConfig::default());
//!
//! engine.toggle();
//! let mut rx = engine.subscribe();
//! while rx.changed().await.is_ok() {
//!     let snapshot = rx.borrow().clone();
//!     if let (Some(coords), Some(accuracy)) = (snapshot.coords, snapshot.accuracy) {
//!         println!("{} ({})", coords, accuracy);
//!     }
//! }
//! ```
//!
//! # Components
//!
//! - [`capability`] - `LocationCapability` trait for the host device
//! - [`state`] - `PositionReading`, `Fix`, `AcquisitionSnapshot`, `AcquisitionPhase`
//! - [`session`] - the per-toggle acquisition state machine
//! - [`engine`] - `GeolocationEngine`, the public toggle/disable surface
//! - [`replay`] - `ReplayCapability`, a recorded-track device adapter

mod capability;
mod config;
mod engine;
mod error;
mod replay;
mod session;
mod state;

pub use capability::{LocationCapability, PositionOptions, WatchId, WatchSubscription};
pub use config::{
    AcquisitionConfig, DEFAULT_REFINE_TIMEOUT_SECS, DEFAULT_SEED_TIMEOUT_SECS,
    DEFAULT_TARGET_ACCURACY_M,
};
pub use engine::GeolocationEngine;
pub use error::{GeolocationError, GENERIC_FAILURE_MESSAGE, UNSUPPORTED_MESSAGE};
pub use replay::{ReplayCapability, ReplayError, ReplayEvent, ReplayFailure, ReplayStep};
pub use state::{AcquisitionPhase, AcquisitionSnapshot, Fix, PositionReading};
