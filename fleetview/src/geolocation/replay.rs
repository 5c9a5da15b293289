//! Replay capability - a device adapter backed by a recorded track.
//!
//! Useful wherever there is no live location hardware: the CLI, demos, and
//! integration tests. The first step answers the single-fix request; the
//! remaining steps are played back, each after its own delay, on every
//! continuous watch.
//!
//! # File format
//!
//! ```json
//! [
//!   { "delay_ms": 300,  "latitude": 14.5547, "longitude": 121.0244, "accuracy": 1200.0 },
//!   { "delay_ms": 1000, "latitude": 14.5551, "longitude": 121.0240, "accuracy": 65.0 },
//!   { "delay_ms": 500,  "error": "position_unavailable" },
//!   { "delay_ms": 1500, "latitude": 14.5550, "longitude": 121.0241, "accuracy": 12.0 }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::capability::{LocationCapability, PositionOptions, WatchId, WatchSubscription};
use super::error::GeolocationError;
use super::state::PositionReading;

/// Errors loading a recorded track.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read track file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse track file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure kinds a track can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl From<ReplayFailure> for GeolocationError {
    fn from(f: ReplayFailure) -> Self {
        match f {
            ReplayFailure::PermissionDenied => GeolocationError::PermissionDenied,
            ReplayFailure::PositionUnavailable => {
                GeolocationError::PositionUnavailable("replayed failure".to_string())
            }
            ReplayFailure::Timeout => GeolocationError::Timeout,
        }
    }
}

/// What a step delivers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReplayEvent {
    Fix {
        latitude: f64,
        longitude: f64,
        accuracy: f64,
    },
    Failure {
        error: ReplayFailure,
    },
}

impl ReplayEvent {
    fn into_result(self) -> Result<PositionReading, GeolocationError> {
        match self {
            ReplayEvent::Fix {
                latitude,
                longitude,
                accuracy,
            } => Ok(PositionReading::new(latitude, longitude, accuracy)),
            ReplayEvent::Failure { error } => Err(error.into()),
        }
    }
}

/// One entry of a recorded track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayStep {
    /// Delay before this step is delivered.
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(flatten)]
    pub event: ReplayEvent,
}

impl ReplayStep {
    /// A fix delivered after `delay_ms`.
    pub fn fix(delay_ms: u64, latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            delay_ms,
            event: ReplayEvent::Fix {
                latitude,
                longitude,
                accuracy,
            },
        }
    }
}

/// Location capability that replays a recorded track.
pub struct ReplayCapability {
    seed: Option<ReplayStep>,
    watch_steps: Vec<ReplayStep>,
    next_id: AtomicU64,
    players: Mutex<HashMap<WatchId, JoinHandle<()>>>,
}

impl ReplayCapability {
    /// Create from in-memory steps.
    pub fn new(steps: Vec<ReplayStep>) -> Self {
        let mut steps = steps.into_iter();
        Self {
            seed: steps.next(),
            watch_steps: steps.collect(),
            next_id: AtomicU64::new(1),
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Load a JSON track file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Parse a JSON track.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ReplayError> {
        let steps: Vec<ReplayStep> = serde_json::from_slice(bytes)?;
        Ok(Self::new(steps))
    }

    /// Number of watches currently playing.
    pub fn active_watches(&self) -> usize {
        self.players.lock().len()
    }
}

impl LocationCapability for ReplayCapability {
    async fn request_once(
        &self,
        options: PositionOptions,
    ) -> Result<PositionReading, GeolocationError> {
        let Some(step) = self.seed.clone() else {
            return Err(GeolocationError::PositionUnavailable(
                "empty track".to_string(),
            ));
        };

        let delay = Duration::from_millis(step.delay_ms);
        if delay > options.timeout {
            tokio::time::sleep(options.timeout).await;
            return Err(GeolocationError::Timeout);
        }
        tokio::time::sleep(delay).await;
        step.event.into_result()
    }

    fn watch_continuous(
        &self,
        _options: PositionOptions,
    ) -> Result<WatchSubscription, GeolocationError> {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.watch_steps.len().max(1));
        let steps = self.watch_steps.clone();

        let player = tokio::spawn(async move {
            for step in steps {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
                if tx.send(step.event.into_result()).await.is_err() {
                    break;
                }
            }
            // Keep the watch open after the track ends, as a device would.
            tx.closed().await;
        });

        self.players.lock().insert(id, player);
        Ok(WatchSubscription { id, readings: rx })
    }

    fn cancel_watch(&self, id: WatchId) {
        if let Some(player) = self.players.lock().remove(&id) {
            player.abort();
        }
    }
}

impl Drop for ReplayCapability {
    fn drop(&mut self) {
        for (_, player) in self.players.lock().drain() {
            player.abort();
        }
    }
}
