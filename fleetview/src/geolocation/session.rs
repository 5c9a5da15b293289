//! Acquisition session - the per-toggle seed/refine state machine.
//!
//! A session is created by the engine on toggle-on and runs as a spawned
//! task until it completes or the engine tears it down. All writes go
//! through [`SharedState::publish_if_current`], which drops them once the
//! session's generation is no longer current.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::capability::{LocationCapability, WatchId};
use super::config::AcquisitionConfig;
use super::engine::SharedState;
use super::error::GeolocationError;
use super::state::{AcquisitionPhase, PositionReading};
use crate::coord::AccuracyRadius;

/// Result of offering one reading to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Offer {
    /// Invalid coordinates or accuracy; dropped at the boundary.
    Rejected,
    /// Valid but not strictly better than the current best.
    NotBetter { reached_target: bool },
    /// Published as the new best.
    Accepted { reached_target: bool },
    /// The session was torn down; nothing was published.
    Stale,
}

impl Offer {
    fn reached_target(self) -> bool {
        matches!(
            self,
            Offer::NotBetter {
                reached_target: true
            } | Offer::Accepted {
                reached_target: true
            }
        )
    }
}

/// One toggle-on period of location acquisition.
pub(super) struct AcquisitionSession<C: LocationCapability> {
    generation: u64,
    capability: Arc<C>,
    config: AcquisitionConfig,
    shared: Arc<SharedState>,
    cancel: CancellationToken,

    /// Open watch, shared with the engine so `disable()` can cancel it
    /// without waiting for this task.
    watch: Arc<Mutex<Option<WatchId>>>,

    /// Best accuracy seen in this session. Starts unknown on every toggle.
    best: AccuracyRadius,

    /// Valid fixes published so far.
    fixes: u32,
}

impl<C: LocationCapability> AcquisitionSession<C> {
    pub(super) fn new(
        generation: u64,
        capability: Arc<C>,
        config: AcquisitionConfig,
        shared: Arc<SharedState>,
        cancel: CancellationToken,
        watch: Arc<Mutex<Option<WatchId>>>,
    ) -> Self {
        Self {
            generation,
            capability,
            config,
            shared,
            cancel,
            watch,
            best: AccuracyRadius::UNKNOWN,
            fixes: 0,
        }
    }

    /// Spawn the session on the current runtime.
    pub(super) fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(mut self) {
        info!(
            generation = self.generation,
            seed_timeout_ms = self.config.seed_timeout.as_millis() as u64,
            refine_timeout_ms = self.config.refine_timeout.as_millis() as u64,
            target_accuracy_m = self.config.target_accuracy_m,
            "Location acquisition started"
        );

        if !self.seed().await {
            return;
        }
        self.refine().await;
    }

    /// Seed phase. Returns false if the session was cancelled meanwhile.
    async fn seed(&mut self) -> bool {
        let capability = Arc::clone(&self.capability);
        let request = capability.request_once(self.config.seed_options());

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return false,
            r = tokio::time::timeout(self.config.seed_timeout, request) => r,
        };

        match result {
            Ok(Ok(reading)) => {
                let offer = self.offer(&reading);
                debug!(generation = self.generation, ?offer, "Seed fix received");
            }
            Ok(Err(e)) => {
                debug!(generation = self.generation, error = %e, "Seed fix failed, continuing to refinement");
            }
            Err(_) => {
                debug!(
                    generation = self.generation,
                    "Seed fix timed out, continuing to refinement"
                );
            }
        }
        !self.cancel.is_cancelled()
    }

    /// Refinement phase.
    async fn refine(&mut self) {
        let subscription = match self.capability.watch_continuous(self.config.watch_options()) {
            Ok(s) => s,
            Err(e) => {
                warn!(generation = self.generation, error = %e, "Failed to open location watch");
                self.finish(Some(e));
                return;
            }
        };

        let id = subscription.id;
        let mut readings = subscription.readings;
        *self.watch.lock() = Some(id);

        // disable() cancels the token before it takes the id, so a teardown
        // that ran while the watch was opening is seen here.
        if self.cancel.is_cancelled() {
            self.release_watch();
            return;
        }

        self.shared.publish_if_current(self.generation, |s| {
            s.phase = AcquisitionPhase::Refining;
        });

        let deadline = tokio::time::sleep(self.config.refine_timeout);
        tokio::pin!(deadline);

        let mut failure = None;
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    trace!(generation = self.generation, "Refinement cancelled");
                    self.release_watch();
                    return;
                }
                _ = &mut deadline => {
                    debug!(
                        generation = self.generation,
                        best_accuracy_m = self.best.meters(),
                        "Refinement timeout, accepting best effort"
                    );
                    break;
                }
                msg = readings.recv() => match msg {
                    Some(Ok(reading)) => {
                        if self.offer(&reading).reached_target() {
                            debug!(
                                generation = self.generation,
                                accuracy_m = reading.accuracy,
                                "Target accuracy reached"
                            );
                            break;
                        }
                    }
                    Some(Err(e)) if e.is_terminal() => {
                        warn!(generation = self.generation, error = %e, "Location watch failed");
                        failure = Some(e);
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(generation = self.generation, error = %e, "Transient watch error");
                    }
                    None => {
                        debug!(generation = self.generation, "Location watch closed by device");
                        break;
                    }
                }
            }
        }

        self.release_watch();
        self.finish(failure);
    }

    /// Validate a reading and publish it if strictly more accurate.
    pub(super) fn offer(&mut self, reading: &PositionReading) -> Offer {
        let fix = match reading.validate() {
            Ok(fix) => fix,
            Err(e) => {
                trace!(generation = self.generation, error = %e, "Discarding invalid reading");
                return Offer::Rejected;
            }
        };

        let reached_target = fix.accuracy.meters() <= self.config.target_accuracy_m;
        if !fix.accuracy.is_better_than(&self.best) {
            return Offer::NotBetter { reached_target };
        }

        let published = self.shared.publish_if_current(self.generation, |s| {
            s.coords = Some(fix.coords);
            s.accuracy = Some(fix.accuracy);
            s.error = None;
        });
        if !published {
            return Offer::Stale;
        }

        self.best = fix.accuracy;
        self.fixes += 1;
        debug!(
            generation = self.generation,
            latitude = fix.coords.latitude(),
            longitude = fix.coords.longitude(),
            accuracy_m = fix.accuracy.meters(),
            "Position refined"
        );
        Offer::Accepted { reached_target }
    }

    /// Cancel the watch unless `disable()` already did.
    fn release_watch(&self) {
        if let Some(id) = self.watch.lock().take() {
            self.capability.cancel_watch(id);
            trace!(generation = self.generation, %id, "Location watch released");
        }
    }

    /// Mark the session complete, surfacing an error if it produced nothing.
    fn finish(&self, failure: Option<GeolocationError>) {
        let error = if self.fixes == 0 {
            Some(
                failure
                    .unwrap_or(GeolocationError::Timeout)
                    .user_message()
                    .to_string(),
            )
        } else {
            None
        };

        let fixes = self.fixes;
        let best = self.best;
        self.shared.complete_if_current(self.generation, |s| {
            if error.is_some() {
                s.error = error;
            }
            s.phase = AcquisitionPhase::Complete;
        });
        info!(
            generation = self.generation,
            fixes,
            best_accuracy_m = best.meters(),
            "Location acquisition complete"
        );
    }
}
