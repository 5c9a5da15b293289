//! Error types for device location acquisition.

use thiserror::Error;

/// Shown when the host has no location capability at all.
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation not supported";

/// Shown for every other acquisition failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to retrieve your location";

/// Errors reported by a [`LocationCapability`](super::LocationCapability).
///
/// The engine never returns these to its caller; they are folded into the
/// snapshot's `error` string via [`GeolocationError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The device exposes no location API.
    #[error("Geolocation not supported")]
    CapabilityUnavailable,

    /// The user (or platform policy) refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not determine a position.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// No fix arrived within the requested timeout.
    #[error("Location request timed out")]
    Timeout,
}

impl GeolocationError {
    /// The short message surfaced to the user.
    ///
    /// Permission and timeout failures are deliberately indistinguishable.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CapabilityUnavailable => UNSUPPORTED_MESSAGE,
            Self::PermissionDenied | Self::PositionUnavailable(_) | Self::Timeout => {
                GENERIC_FAILURE_MESSAGE
            }
        }
    }

    /// Whether a continuous watch should stop on this error.
    ///
    /// Position-unavailable blips are common while a receiver warms up and
    /// are ridden out; a permission refusal will not change mid-session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable | Self::PermissionDenied)
    }
}
