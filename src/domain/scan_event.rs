//! Scan events: one observed use of a code.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CodeIdentifier, Coordinates};

/// Context reported by the site that observed a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Client network address as reported.
    pub ip_address: Option<String>,
    /// Client user agent string.
    pub user_agent: Option<String>,
    /// Client location.
    pub location: Option<Coordinates>,
}

/// A validated scan awaiting insertion.
///
/// Carries no timestamp: `recorded_at` is assigned by the store when the
/// row is written, so clients cannot backdate events.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScanEvent {
    /// Owning code.
    pub code_ref: CodeIdentifier,
    /// Client network address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Client location.
    pub location: Option<Coordinates>,
}

impl NewScanEvent {
    /// Binds a report to its owning code.
    #[must_use]
    pub fn new(code_ref: CodeIdentifier, report: ScanReport) -> Self {
        Self {
            code_ref,
            ip_address: report.ip_address,
            user_agent: report.user_agent,
            location: report.location,
        }
    }

    /// Attaches the store-assigned key and insertion time.
    #[must_use]
    pub fn into_event(self, id: i64, recorded_at: DateTime<Utc>) -> ScanEvent {
        ScanEvent {
            id,
            code_ref: self.code_ref,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            location: self.location,
            recorded_at,
        }
    }
}

/// A persisted, immutable scan observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEvent {
    /// Surrogate key.
    pub id: i64,
    /// Owning code.
    pub code_ref: CodeIdentifier,
    /// Client network address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Client location.
    pub location: Option<Coordinates>,
    /// Server-assigned insertion time.
    pub recorded_at: DateTime<Utc>,
}
