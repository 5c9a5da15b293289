//! State types for device location acquisition.
//!
//! - [`PositionReading`] - raw, unvalidated device output
//! - [`Fix`] - a reading that passed boundary validation
//! - [`AcquisitionPhase`] - where the current session is
//! - [`AcquisitionSnapshot`] - what consumers see

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coord::{AccuracyRadius, CoordError, Coordinate};

/// A position report exactly as the device delivered it.
///
/// Values are raw `f64`s because devices do hand out NaN on occasion; they
/// are only trusted after [`PositionReading::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub latitude: f64,
    pub longitude: f64,

    /// Horizontal accuracy radius in meters.
    pub accuracy: f64,

    /// When the device measured this position.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl PositionReading {
    /// Create a reading stamped with the current time.
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: Utc::now(),
        }
    }

    /// Check the reading at the boundary.
    pub fn validate(&self) -> Result<Fix, CoordError> {
        Ok(Fix {
            coords: Coordinate::new(self.latitude, self.longitude)?,
            accuracy: AccuracyRadius::new(self.accuracy)?,
        })
    }
}

/// A validated position with its accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub coords: Coordinate,
    pub accuracy: AccuracyRadius,
}

/// Lifecycle of the current acquisition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionPhase {
    /// No session.
    #[default]
    Idle,
    /// Waiting on the single seed fix.
    Seeding,
    /// Continuous watch open, improving accuracy.
    Refining,
    /// Target accuracy reached, timeout elapsed, or the watch failed.
    Complete,
}

impl fmt::Display for AcquisitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Seeding => write!(f, "Seeding"),
            Self::Refining => write!(f, "Refining"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

/// Published acquisition state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcquisitionSnapshot {
    /// Best position so far in this session.
    pub coords: Option<Coordinate>,

    /// Accuracy of `coords`.
    pub accuracy: Option<AccuracyRadius>,

    /// User-facing failure description, if the session failed.
    pub error: Option<String>,

    pub phase: AcquisitionPhase,
}

impl AcquisitionSnapshot {
    /// Location is "on" once a position has been published.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.coords.is_some()
    }

    /// The published fix, if any.
    pub fn fix(&self) -> Option<Fix> {
        match (self.coords, self.accuracy) {
            (Some(coords), Some(accuracy)) => Some(Fix { coords, accuracy }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_validates() {
        let fix = PositionReading::new(14.6, 121.0, 35.0).validate().unwrap();
        assert_eq!(fix.coords, Coordinate::new(14.6, 121.0).unwrap());
        assert_eq!(fix.accuracy.meters(), 35.0);
    }

    #[test]
    fn test_reading_rejects_nan() {
        assert!(PositionReading::new(f64::NAN, 121.0, 10.0)
            .validate()
            .is_err());
        assert!(PositionReading::new(14.6, 121.0, f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_reading_deserialize_without_timestamp() {
        let json = r#"{"latitude": 14.6, "longitude": 121.0, "accuracy": 40.0}"#;
        let reading: PositionReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.accuracy, 40.0);
    }

    #[test]
    fn test_default_snapshot_inactive() {
        let snapshot = AcquisitionSnapshot::default();
        assert!(!snapshot.is_active());
        assert!(snapshot.fix().is_none());
        assert_eq!(snapshot.phase, AcquisitionPhase::Idle);
    }
}
