//! Geographic coordinates attached to codes and scans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScanmapError;

/// A latitude/longitude pair in decimal degrees.
///
/// Construct through [`Coordinates::new`] at the request boundary to get
/// range checking; the core trusts values it receives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::InvalidRequest`] if either value is not finite
    /// or falls outside its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ScanmapError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ScanmapError::InvalidRequest(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ScanmapError::InvalidRequest(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds coordinates from an optional column pair; both halves must be
    /// present.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}
