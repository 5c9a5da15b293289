//! Device location capability abstraction.
//!
//! The [`LocationCapability`] trait is the seam between the acquisition state
//! machine and whatever the host platform offers (a browser geolocation API,
//! a mobile OS location service, gpsd, a recorded track). It mirrors the
//! usual single-fix / watch / clear-watch triple.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

use super::error::GeolocationError;
use super::state::PositionReading;

/// Options passed with every location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Prefer the most accurate (and most power-hungry) positioning method.
    pub high_accuracy: bool,

    /// Maximum age of a cached fix the device may answer with.
    pub max_cached_age: Duration,

    /// How long the device may take to produce a fix.
    pub timeout: Duration,
}

/// Identifier of an open continuous watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// An open continuous watch.
///
/// Readings (or per-reading failures) arrive on `readings` until the watch
/// is cancelled or the device closes the channel.
#[derive(Debug)]
pub struct WatchSubscription {
    pub id: WatchId,
    pub readings: mpsc::Receiver<Result<PositionReading, GeolocationError>>,
}

/// Trait for the host device's location API.
///
/// Implementations must be cheap to share; the engine holds them in an `Arc`
/// and calls them from spawned tasks.
pub trait LocationCapability: Send + Sync + 'static {
    /// Whether the host exposes a location API at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Request a single fix.
    fn request_once(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<PositionReading, GeolocationError>> + Send;

    /// Open a continuous watch.
    fn watch_continuous(
        &self,
        options: PositionOptions,
    ) -> Result<WatchSubscription, GeolocationError>;

    /// Stop a continuous watch. Unknown or already-cancelled ids are ignored.
    fn cancel_watch(&self, id: WatchId);
}
