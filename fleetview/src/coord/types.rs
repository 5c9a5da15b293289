//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors raised when raw values fail boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude or longitude is NaN or infinite
    #[error("Non-finite coordinate: ({latitude}, {longitude})")]
    NonFinite { latitude: f64, longitude: f64 },

    /// Latitude or longitude is finite but outside the WGS84 range
    #[error("Coordinate out of range: ({latitude}, {longitude})")]
    OutOfRange { latitude: f64, longitude: f64 },

    /// Accuracy radius is negative or NaN
    #[error("Invalid accuracy radius: {0} m")]
    InvalidAccuracy(f64),
}

/// A WGS84 position in decimal degrees.
///
/// Both components are guaranteed finite and in range; the only way to build
/// one is through [`Coordinate::new`] (or deserialization, which calls it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validates and builds a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::OutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from optional raw parts, as found on vehicle
    /// records and telemetry payloads. Missing or invalid parts yield `None`.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Builds a coordinate from a longitude-first pair (GeoJSON order).
    pub fn from_lon_lat(pair: [f64; 2]) -> Result<Self, CoordError> {
        Self::new(pair[1], pair[0])
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Bit-exact key used for memoization.
    ///
    /// Two coordinates share a key exactly when both components are
    /// numerically identical, independent of where the values came from.
    #[inline]
    pub fn key(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Horizontal accuracy radius in meters (lower is better).
///
/// [`AccuracyRadius::UNKNOWN`] (+∞) stands for "no reading yet", so any real
/// reading compares strictly better than it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRadius(f64);

impl AccuracyRadius {
    /// No reading yet.
    pub const UNKNOWN: Self = Self(f64::INFINITY);

    /// Validates and builds an accuracy radius. Zero is allowed, +∞ maps to
    /// [`AccuracyRadius::UNKNOWN`].
    pub fn new(meters: f64) -> Result<Self, CoordError> {
        if meters.is_nan() || meters < 0.0 {
            return Err(CoordError::InvalidAccuracy(meters));
        }
        Ok(Self(meters))
    }

    /// Returns true if this radius is strictly smaller than `other`.
    #[inline]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    #[inline]
    pub fn meters(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        self.0.is_finite()
    }
}

impl Default for AccuracyRadius {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for AccuracyRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "±{:.0} m", self.0)
        } else {
            write!(f, "unknown")
        }
    }
}
