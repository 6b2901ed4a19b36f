//! Records that can be placed on a map.
//!
//! The map renderer depends only on [`Locatable`]; codes and scan events
//! each provide their own annotations.

use serde::Serialize;

use super::{Code, Coordinates, ScanEvent};

/// Placeholder for missing annotation values.
const UNKNOWN: &str = "unknown";

/// One labelled line in a map popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Field label.
    pub label: &'static str,
    /// Field value (plain text; escaped by the renderer).
    pub value: String,
}

impl Annotation {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// A record with an optional position and human-readable description.
pub trait Locatable {
    /// Position of the record, if known.
    fn coordinates(&self) -> Option<Coordinates>;

    /// Full annotation shown in pin popups.
    fn describe(&self) -> Vec<Annotation>;

    /// Compact one-line summary shown in cluster popups.
    fn summary(&self) -> String;

    /// PNG bytes to inline in the popup, if the record has an image.
    fn inline_image(&self) -> Option<&[u8]> {
        None
    }
}

fn location_text(location: Option<Coordinates>) -> String {
    location.map_or_else(|| UNKNOWN.to_string(), |c| c.to_string())
}

impl Locatable for Code {
    fn coordinates(&self) -> Option<Coordinates> {
        self.location
    }

    fn describe(&self) -> Vec<Annotation> {
        vec![
            Annotation::new("Name", self.display_name()),
            Annotation::new("URL", self.target_url.as_str()),
            Annotation::new("Version", self.params.version.to_string()),
            Annotation::new("Location", location_text(self.location)),
        ]
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.display_name(), self.target_url)
    }

    fn inline_image(&self) -> Option<&[u8]> {
        Some(&self.image_bytes)
    }
}

impl Locatable for ScanEvent {
    fn coordinates(&self) -> Option<Coordinates> {
        self.location
    }

    fn describe(&self) -> Vec<Annotation> {
        vec![
            Annotation::new("IP Address", self.ip_address.as_deref().unwrap_or(UNKNOWN)),
            Annotation::new("User Agent", self.user_agent.as_deref().unwrap_or(UNKNOWN)),
            Annotation::new("Location", location_text(self.location)),
            Annotation::new("Scan Time", self.recorded_at.to_rfc3339()),
        ]
    }

    fn summary(&self) -> String {
        format!(
            "Scan at {} from {}",
            self.recorded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.ip_address.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeIdentifier, NewScanEvent, ScanReport};
    use chrono::Utc;

    fn scan(ip: Option<&str>) -> ScanEvent {
        NewScanEvent::new(
            CodeIdentifier::new(),
            ScanReport {
                ip_address: ip.map(str::to_string),
                user_agent: None,
                location: Some(Coordinates {
                    latitude: 1.0,
                    longitude: 2.0,
                }),
            },
        )
        .into_event(1, Utc::now())
    }

    #[test]
    fn scan_describes_context_fields() {
        let labels: Vec<_> = scan(Some("10.0.0.1"))
            .describe()
            .into_iter()
            .map(|a| a.label)
            .collect();
        assert_eq!(labels, vec!["IP Address", "User Agent", "Location", "Scan Time"]);
    }

    #[test]
    fn missing_fields_read_unknown() {
        let described = scan(None).describe();
        assert!(described.iter().any(|a| a.value == "unknown"));
        assert!(scan(None).summary().ends_with("unknown"));
    }

    #[test]
    fn scans_have_no_image() {
        assert!(scan(None).inline_image().is_none());
    }
}
