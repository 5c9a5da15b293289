//! Vehicle records consumed from the rental platform's REST services.
//!
//! Only the garage coordinate pair carries meaning for the location core;
//! the remaining fields are passed through for display.

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// Opaque vehicle identifier as issued by the vehicle service.
pub type VehicleId = String;

/// A rentable vehicle as returned by the vehicle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,

    /// Owner-declared home location. Either part may be missing or garbage
    /// on legacy records.
    #[serde(default)]
    pub garage_latitude: Option<f64>,
    #[serde(default)]
    pub garage_longitude: Option<f64>,

    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub daily_rate: Option<f64>,
}

impl Vehicle {
    /// Create a vehicle with only an id and garage location.
    pub fn new(id: impl Into<VehicleId>, garage_latitude: f64, garage_longitude: f64) -> Self {
        Self {
            id: id.into(),
            garage_latitude: Some(garage_latitude),
            garage_longitude: Some(garage_longitude),
            make: None,
            model: None,
            plate_number: None,
            daily_rate: None,
        }
    }

    /// Create a vehicle with no garage location on record.
    pub fn without_garage(id: impl Into<VehicleId>) -> Self {
        Self {
            garage_latitude: None,
            garage_longitude: None,
            ..Self::new(id, 0.0, 0.0)
        }
    }

    /// The garage location, if both parts are present and valid.
    pub fn garage_coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.garage_latitude, self.garage_longitude)
    }

    /// Short label for list and marker popups.
    pub fn display_name(&self) -> String {
        match (&self.make, &self.model) {
            (Some(make), Some(model)) => format!("{} {}", make, model),
            (Some(make), None) => make.clone(),
            (None, Some(model)) => model.clone(),
            (None, None) => self.id.clone(),
        }
    }
}
