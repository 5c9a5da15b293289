//! Geolocation engine - the public toggle/disable surface.
//!
//! The engine owns at most one [`AcquisitionSession`] at a time and the
//! published [`AcquisitionSnapshot`]. Consumers read the snapshot directly or
//! subscribe to a `watch` channel that republishes on every change.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::capability::{LocationCapability, WatchId};
use super::config::AcquisitionConfig;
use super::error::GeolocationError;
use super::session::AcquisitionSession;
use super::state::{AcquisitionPhase, AcquisitionSnapshot};
use crate::coord::{AccuracyRadius, Coordinate};

/// Handles to the running session.
struct ActiveSession {
    cancel: CancellationToken,
    watch: Arc<Mutex<Option<WatchId>>>,
    task: JoinHandle<()>,
}

/// Internal state for the engine.
struct EngineState {
    snapshot: AcquisitionSnapshot,

    /// Bumped on every enable and disable. Sessions carry the value they were
    /// started with and may only publish while it is current.
    generation: u64,

    active: Option<ActiveSession>,
}

/// State shared between the engine and its session task.
pub(super) struct SharedState {
    state: Mutex<EngineState>,
    snapshot_tx: watch::Sender<AcquisitionSnapshot>,
}

impl SharedState {
    fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(AcquisitionSnapshot::default());
        Self {
            state: Mutex::new(EngineState {
                snapshot: AcquisitionSnapshot::default(),
                generation: 0,
                active: None,
            }),
            snapshot_tx,
        }
    }

    /// Apply `update` if `generation` is still current.
    ///
    /// Returns false (and changes nothing) for a torn-down session.
    pub(super) fn publish_if_current(
        &self,
        generation: u64,
        update: impl FnOnce(&mut AcquisitionSnapshot),
    ) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        update(&mut state.snapshot);
        self.snapshot_tx.send_replace(state.snapshot.clone());
        true
    }

    /// Like [`publish_if_current`](Self::publish_if_current), and also
    /// releases the session slot so the next toggle starts fresh.
    pub(super) fn complete_if_current(
        &self,
        generation: u64,
        update: impl FnOnce(&mut AcquisitionSnapshot),
    ) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            return false;
        }
        update(&mut state.snapshot);
        state.active = None;
        self.snapshot_tx.send_replace(state.snapshot.clone());
        true
    }
}

/// Geolocation acquisition engine.
///
/// `toggle()` and `disable()` never fail; problems surface in the snapshot's
/// `error` field. Requires a tokio runtime for `toggle()`.
pub struct GeolocationEngine<C: LocationCapability> {
    capability: Arc<C>,
    config: AcquisitionConfig,
    shared: Arc<SharedState>,
}

impl<C: LocationCapability> GeolocationEngine<C> {
    /// Create an idle engine over a device capability.
    pub fn new(capability: Arc<C>, config: AcquisitionConfig) -> Self {
        Self {
            capability,
            config,
            shared: Arc::new(SharedState::new()),
        }
    }

    /// Turn location on if it is off, off if it is on.
    ///
    /// "On" means a session is running or a position is published.
    pub fn toggle(&self) {
        let on = {
            let state = self.shared.state.lock();
            state.active.is_some() || state.snapshot.is_active()
        };

        if on {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Stop acquisition and clear all published state. Idempotent.
    ///
    /// The open watch and pending timers are released before this returns;
    /// anything the old session still delivers is ignored. A watch that was
    /// still being opened is released by the session once the open returns.
    pub fn disable(&self) {
        let active = {
            let mut state = self.shared.state.lock();
            state.generation += 1;
            let active = state.active.take();
            if state.snapshot != AcquisitionSnapshot::default() {
                state.snapshot = AcquisitionSnapshot::default();
                self.shared.snapshot_tx.send_replace(state.snapshot.clone());
            }
            active
        };

        if let Some(active) = active {
            active.cancel.cancel();
            if let Some(id) = active.watch.lock().take() {
                self.capability.cancel_watch(id);
            }
            active.task.abort();
            info!("Location acquisition disabled");
        }
    }

    fn enable(&self) {
        let mut state = self.shared.state.lock();

        if !self.capability.is_supported() {
            warn!("No location capability on this device");
            state.snapshot = AcquisitionSnapshot {
                error: Some(GeolocationError::CapabilityUnavailable.user_message().to_string()),
                ..Default::default()
            };
            self.shared.snapshot_tx.send_replace(state.snapshot.clone());
            return;
        }

        state.generation += 1;
        state.snapshot = AcquisitionSnapshot {
            phase: AcquisitionPhase::Seeding,
            ..Default::default()
        };
        self.shared.snapshot_tx.send_replace(state.snapshot.clone());

        let cancel = CancellationToken::new();
        let watch = Arc::new(Mutex::new(None));
        let session = AcquisitionSession::new(
            state.generation,
            Arc::clone(&self.capability),
            self.config.clone(),
            Arc::clone(&self.shared),
            cancel.clone(),
            Arc::clone(&watch),
        );

        state.active = Some(ActiveSession {
            cancel,
            watch,
            task: session.start(),
        });
    }

    /// Current published state.
    pub fn snapshot(&self) -> AcquisitionSnapshot {
        self.shared.state.lock().snapshot.clone()
    }

    pub fn coords(&self) -> Option<Coordinate> {
        self.shared.state.lock().snapshot.coords
    }

    pub fn accuracy(&self) -> Option<AccuracyRadius> {
        self.shared.state.lock().snapshot.accuracy
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.lock().snapshot.error.clone()
    }

    /// True once a position has been published.
    pub fn is_active(&self) -> bool {
        self.shared.state.lock().snapshot.is_active()
    }

    /// True while a session task is running.
    pub fn is_acquiring(&self) -> bool {
        self.shared.state.lock().active.is_some()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<AcquisitionSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Wait until the current session (if any) stops acquiring.
    pub async fn settled(&self) -> AcquisitionSnapshot {
        let mut rx = self.subscribe();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if !matches!(
                    snapshot.phase,
                    AcquisitionPhase::Seeding | AcquisitionPhase::Refining
                ) {
                    return snapshot.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.snapshot();
            }
        }
    }
}

impl<C: LocationCapability> Drop for GeolocationEngine<C> {
    fn drop(&mut self) {
        self.disable();
    }
}
