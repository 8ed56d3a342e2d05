//! Core data types for obstacles and route coordinates.

use crate::error::InputShapeError;
use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_radians(self) -> LatLonRad {
        LatLonRad {
            lat: self.lat.to_radians(),
            lon: self.lon.to_radians(),
        }
    }

    /// Parse a raw `[latitude, longitude]` pair as received from a client.
    pub fn from_pair(index: usize, pair: &[f64]) -> Result<Self, InputShapeError> {
        let [lat, lon] = pair else {
            return Err(InputShapeError::WrongArity {
                index,
                len: pair.len(),
            });
        };
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InputShapeError::NonFinite { index });
        }
        Ok(Self::new(*lat, *lon))
    }
}

/// A position in radians, the unit every great-circle computation works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonRad {
    pub lat: f64,
    pub lon: f64,
}

/// One row of the obstacle dataset after severity filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Raw 1–5 rating
    pub severity: f64,
    /// Parsed for display only; never used in scoring
    pub is_temporary: bool,
    pub label_type: String,
    pub neighborhood: String,
    pub attribute_id: Option<String>,
}

/// A working obstacle: the record plus its derived scoring fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub record: ObstacleRecord,
    /// Severity mapped into [0, 1]
    pub severity_norm: f64,
    pub position: LatLonRad,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pair_accepts_two_finite_values() {
        let point = LatLon::from_pair(0, &[47.6, -122.3]).unwrap();
        assert_eq!(point, LatLon::new(47.6, -122.3));
    }

    #[test]
    fn from_pair_rejects_wrong_arity() {
        assert_eq!(
            LatLon::from_pair(3, &[47.6]),
            Err(InputShapeError::WrongArity { index: 3, len: 1 })
        );
        assert_eq!(
            LatLon::from_pair(0, &[47.6, -122.3, 10.0]),
            Err(InputShapeError::WrongArity { index: 0, len: 3 })
        );
    }

    #[test]
    fn from_pair_rejects_nan() {
        assert_eq!(
            LatLon::from_pair(1, &[f64::NAN, 0.0]),
            Err(InputShapeError::NonFinite { index: 1 })
        );
    }
}
