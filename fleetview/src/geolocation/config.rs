//! Configuration for the acquisition engine.

use std::time::Duration;

use super::capability::PositionOptions;

/// Default seed phase budget.
pub const DEFAULT_SEED_TIMEOUT_SECS: u64 = 10;

/// Default hard ceiling on the refinement phase.
pub const DEFAULT_REFINE_TIMEOUT_SECS: u64 = 15;

/// Default "good enough" accuracy that ends refinement early.
pub const DEFAULT_TARGET_ACCURACY_M: f64 = 20.0;

/// Acquisition timing and accuracy settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Bounded wait for the seed fix.
    pub seed_timeout: Duration,

    /// Refinement ends after this long regardless of accuracy achieved.
    pub refine_timeout: Duration,

    /// Refinement ends early once a fix is at or below this radius (meters).
    pub target_accuracy_m: f64,

    /// Ask the device for its high-accuracy mode (GPS rather than network).
    pub high_accuracy: bool,
}

impl AcquisitionConfig {
    /// Options for the seed request. Cached fixes are never reused.
    pub fn seed_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            max_cached_age: Duration::ZERO,
            timeout: self.seed_timeout,
        }
    }

    /// Options for the refinement watch.
    pub fn watch_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            max_cached_age: Duration::ZERO,
            timeout: self.refine_timeout,
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            seed_timeout: Duration::from_secs(DEFAULT_SEED_TIMEOUT_SECS),
            refine_timeout: Duration::from_secs(DEFAULT_REFINE_TIMEOUT_SECS),
            target_accuracy_m: DEFAULT_TARGET_ACCURACY_M,
            high_accuracy: true,
        }
    }
}
