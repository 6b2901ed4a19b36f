//! Shared DTO types used across multiple endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Coordinates, TimeWindow};
use crate::error::ScanmapError;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

impl LocationDto {
    /// Validates the pair into domain [`Coordinates`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::InvalidRequest`] if a value is out of range.
    pub fn validate(self) -> Result<Coordinates, ScanmapError> {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl From<Coordinates> for LocationDto {
    fn from(c: Coordinates) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Optional inclusive time window for list, count and map endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimeWindowParams {
    /// Earliest timestamp to include (RFC 3339).
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Latest timestamp to include (RFC 3339).
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl From<TimeWindowParams> for TimeWindow {
    fn from(params: TimeWindowParams) -> Self {
        Self::new(params.start_time, params.end_time)
    }
}
