//! Interactive map documents for located records.
//!
//! [`MapRenderer`] turns any slice of [`crate::domain::Locatable`] records
//! into a self-contained Leaflet HTML page in one of three [`MapMode`]s.

pub mod renderer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanmapError;

pub use renderer::{DEFAULT_ZOOM, MapRenderer};

/// Visualization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// One annotated marker per record.
    Pin,
    /// Density heat layer.
    Heat,
    /// Markers grouped into clusters.
    Cluster,
}

impl MapMode {
    /// Lowercase name used in routes and filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Heat => "heat",
            Self::Cluster => "cluster",
        }
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapMode {
    type Err = ScanmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pin" => Ok(Self::Pin),
            "heat" => Ok(Self::Heat),
            "cluster" => Ok(Self::Cluster),
            other => Err(ScanmapError::InvalidRequest(format!(
                "unknown map mode {other:?}; expected pin, heat or cluster"
            ))),
        }
    }
}

/// A rendered map with its download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    /// Attachment filename, e.g. `map_{identifier}_pin.html`.
    pub filename: String,
    /// Complete HTML document.
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_case_insensitively() {
        assert!(matches!("pin".parse::<MapMode>(), Ok(MapMode::Pin)));
        assert!(matches!("HEAT".parse::<MapMode>(), Ok(MapMode::Heat)));
        assert!(matches!("Cluster".parse::<MapMode>(), Ok(MapMode::Cluster)));
        assert!(matches!(
            "choropleth".parse::<MapMode>(),
            Err(ScanmapError::InvalidRequest(_))
        ));
    }

    #[test]
    fn display_matches_parse() {
        for mode in [MapMode::Pin, MapMode::Heat, MapMode::Cluster] {
            assert!(matches!(mode.to_string().parse::<MapMode>(), Ok(m) if m == mode));
        }
    }
}
