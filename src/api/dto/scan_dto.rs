//! Scan DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::LocationDto;
use crate::domain::{ScanEvent, ScanReport};
use crate::error::ScanmapError;

/// Request body for `POST /scans/{identifier}`.
///
/// Every field is optional. Missing `ip_address` and `user_agent` are
/// taken from the request headers.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecordScanRequest {
    /// Client network address.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Client user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Client location.
    #[serde(default)]
    pub location: Option<LocationDto>,
}

impl RecordScanRequest {
    /// Validates the body into a domain [`ScanReport`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::InvalidRequest`] if the location is out of
    /// range.
    pub fn into_report(self) -> Result<ScanReport, ScanmapError> {
        Ok(ScanReport {
            ip_address: self.ip_address.filter(|s| !s.is_empty()),
            user_agent: self.user_agent.filter(|s| !s.is_empty()),
            location: self.location.map(LocationDto::validate).transpose()?,
        })
    }
}

/// A recorded scan.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Surrogate id.
    pub id: i64,
    /// Owning code.
    pub identifier: uuid::Uuid,
    /// Client network address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Client location.
    pub location: Option<LocationDto>,
    /// Server-assigned timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl From<ScanEvent> for ScanResponse {
    fn from(event: ScanEvent) -> Self {
        Self {
            id: event.id,
            identifier: *event.code_ref.as_uuid(),
            ip_address: event.ip_address,
            user_agent: event.user_agent,
            location: event.location.map(LocationDto::from),
            recorded_at: event.recorded_at,
        }
    }
}

/// List response for `GET /scans/{identifier}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanListResponse {
    /// Scans oldest first.
    pub data: Vec<ScanResponse>,
    /// Number of scans returned.
    pub total: usize,
}

/// Response body for `GET /scans/{identifier}/count`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanCountResponse {
    /// Scans inside the requested window.
    pub scan_count: u64,
}

/// Response body for `DELETE /scans/{identifier}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteScansResponse {
    /// Number of scans removed.
    pub deleted: u64,
}
