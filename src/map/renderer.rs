//! Leaflet map rendering via `minijinja` templates.
//!
//! Templates are named `*.html`, so every interpolated value is
//! HTML-escaped. Popups are rendered to escaped HTML first and then passed
//! to the page script through `tojson`, which also escapes `<`, `>`, `&`
//! and `'`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use minijinja::{Environment, Value, context};
use serde::Serialize;

use super::MapMode;
use crate::domain::{Annotation, Locatable};
use crate::error::ScanmapError;

/// Initial zoom level of every map.
pub const DEFAULT_ZOOM: u8 = 3;

const MAP_TEMPLATE: &str = include_str!("templates/map.html");
const POPUP_TEMPLATE: &str = include_str!("templates/popup.html");

#[derive(Debug, Serialize)]
struct Marker {
    position: [f64; 2],
    popup: String,
}

fn template_error(e: minijinja::Error) -> ScanmapError {
    ScanmapError::Internal(format!("map template: {e}"))
}

/// Renders located records into standalone HTML documents.
#[derive(Debug)]
pub struct MapRenderer {
    env: Environment<'static>,
}

impl MapRenderer {
    /// Builds a renderer with the embedded templates loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::Internal`] if a template fails to compile.
    pub fn new() -> Result<Self, ScanmapError> {
        let mut env = Environment::new();
        env.add_template("map.html", MAP_TEMPLATE)
            .map_err(template_error)?;
        env.add_template("popup.html", POPUP_TEMPLATE)
            .map_err(template_error)?;
        Ok(Self { env })
    }

    /// Renders `records` as a map in the given mode.
    ///
    /// Records without coordinates are skipped. The map is centered on the
    /// first located record at [`DEFAULT_ZOOM`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::EmptyDataset`] if no record has coordinates,
    /// or [`ScanmapError::Internal`] if rendering fails.
    pub fn render(
        &self,
        mode: MapMode,
        title: &str,
        records: &[&dyn Locatable],
    ) -> Result<String, ScanmapError> {
        let located: Vec<(&dyn Locatable, [f64; 2])> = records
            .iter()
            .filter_map(|record| {
                record
                    .coordinates()
                    .map(|c| (*record, [c.latitude, c.longitude]))
            })
            .collect();

        let Some((_, center)) = located.first() else {
            return Err(ScanmapError::EmptyDataset);
        };

        let (markers, points) = match mode {
            MapMode::Pin => (self.markers(&located, |r| self.full_popup(r))?, Vec::new()),
            MapMode::Cluster => (self.markers(&located, |r| self.summary_popup(r))?, Vec::new()),
            MapMode::Heat => (
                Vec::new(),
                located.iter().map(|(_, position)| *position).collect(),
            ),
        };

        let template = self.env.get_template("map.html").map_err(template_error)?;
        let html = template
            .render(context! {
                title => title,
                mode => mode.as_str(),
                center => center,
                zoom => DEFAULT_ZOOM,
                markers => markers,
                points => points,
            })
            .map_err(template_error)?;

        tracing::debug!(
            %mode,
            located = located.len(),
            skipped = records.len() - located.len(),
            "map rendered"
        );
        Ok(html)
    }

    fn markers<F>(
        &self,
        located: &[(&dyn Locatable, [f64; 2])],
        popup: F,
    ) -> Result<Vec<Marker>, ScanmapError>
    where
        F: Fn(&dyn Locatable) -> Result<String, ScanmapError>,
    {
        located
            .iter()
            .map(|(record, position)| {
                Ok(Marker {
                    position: *position,
                    popup: popup(*record)?,
                })
            })
            .collect()
    }

    fn full_popup(&self, record: &dyn Locatable) -> Result<String, ScanmapError> {
        let annotations: Vec<Annotation> = record.describe();
        let image = record
            .inline_image()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| STANDARD.encode(bytes));
        self.popup(context! { annotations => annotations, image => image })
    }

    fn summary_popup(&self, record: &dyn Locatable) -> Result<String, ScanmapError> {
        self.popup(context! { summary => record.summary() })
    }

    fn popup(&self, ctx: Value) -> Result<String, ScanmapError> {
        self.env
            .get_template("popup.html")
            .and_then(|template| template.render(ctx))
            .map_err(template_error)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        Code, CodeIdentifier, Coordinates, EmbeddingPolicy, EncodingParams, ScanEvent,
    };

    fn renderer() -> MapRenderer {
        let Ok(renderer) = MapRenderer::new() else {
            panic!("templates should compile");
        };
        renderer
    }

    fn scan(id: i64, location: Option<(f64, f64)>, user_agent: &str) -> ScanEvent {
        ScanEvent {
            id,
            code_ref: CodeIdentifier::new(),
            ip_address: Some("198.51.100.4".to_string()),
            user_agent: Some(user_agent.to_string()),
            location: location.and_then(|(lat, lng)| Coordinates::new(lat, lng).ok()),
            recorded_at: Utc::now(),
        }
    }

    fn code(location: Option<Coordinates>) -> Code {
        Code {
            id: 1,
            identifier: CodeIdentifier::new(),
            name: Some("Front door".to_string()),
            target_url: "https://example.com".to_string(),
            encoded_payload: "https://example.com".to_string(),
            image_bytes: vec![0x89, b'P', b'N', b'G'],
            params: EncodingParams::default(),
            embedding: EmbeddingPolicy::RecordOnly,
            location,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_dataset_in_every_mode() {
        let renderer = renderer();
        let unlocated = scan(1, None, "agent");
        let records: Vec<&dyn Locatable> = vec![&unlocated];
        for mode in [MapMode::Pin, MapMode::Heat, MapMode::Cluster] {
            assert!(matches!(
                renderer.render(mode, "t", &records),
                Err(ScanmapError::EmptyDataset)
            ));
            assert!(matches!(
                renderer.render(mode, "t", &[]),
                Err(ScanmapError::EmptyDataset)
            ));
        }
    }

    #[test]
    fn pin_map_has_one_marker_per_located_record() {
        let renderer = renderer();
        let scans = [
            scan(1, Some((10.5, 20.25)), "a"),
            scan(2, None, "b"),
            scan(3, Some((10.0, 21.0)), "c"),
            scan(4, Some((11.0, 20.0)), "d"),
        ];
        let records: Vec<&dyn Locatable> = scans.iter().map(|s| s as &dyn Locatable).collect();
        let Ok(html) = renderer.render(MapMode::Pin, "scans", &records) else {
            panic!("render failed");
        };
        assert_eq!(html.matches("L.marker(").count(), 3);
        assert!(html.contains("setView([10.5,20.25], 3)"));
        assert!(html.contains("Scan Time"));
        assert!(!html.contains("L.heatLayer"));
    }

    #[test]
    fn heat_map_feeds_bare_points() {
        let renderer = renderer();
        let scans = [
            scan(1, Some((10.0, 20.0)), "a"),
            scan(2, Some((10.0, 21.0)), "b"),
        ];
        let records: Vec<&dyn Locatable> = scans.iter().map(|s| s as &dyn Locatable).collect();
        let Ok(html) = renderer.render(MapMode::Heat, "scans", &records) else {
            panic!("render failed");
        };
        assert!(html.contains("L.heatLayer([[10.0,20.0],[10.0,21.0]]"));
        assert!(html.contains("leaflet-heat.js"));
        assert!(!html.contains("L.marker("));
        assert!(!html.contains("User Agent"));
    }

    #[test]
    fn cluster_map_uses_summaries() {
        let renderer = renderer();
        let scans = [
            scan(1, Some((1.0, 1.0)), "a"),
            scan(2, Some((1.0, 1.5)), "b"),
        ];
        let records: Vec<&dyn Locatable> = scans.iter().map(|s| s as &dyn Locatable).collect();
        let Ok(html) = renderer.render(MapMode::Cluster, "scans", &records) else {
            panic!("render failed");
        };
        assert!(html.contains("L.markerClusterGroup()"));
        assert_eq!(html.matches("cluster.addLayer(").count(), 2);
        assert!(html.contains("Scan at "));
        assert!(!html.contains("User Agent"));
    }

    #[test]
    fn record_text_is_escaped() {
        let renderer = renderer();
        let hostile = scan(1, Some((0.5, 0.5)), "<script>alert(1)</script>");
        let records: Vec<&dyn Locatable> = vec![&hostile];
        let Ok(html) = renderer.render(MapMode::Pin, "<b>title</b>", &records) else {
            panic!("render failed");
        };
        assert!(!html.contains("<script>alert(1)"));
        assert!(!html.contains("<b>title</b>"));
    }

    #[test]
    fn code_popup_inlines_image() {
        let renderer = renderer();
        let Ok(location) = Coordinates::new(48.5, 2.25) else {
            panic!("valid coordinates");
        };
        let code = code(Some(location));
        let records: Vec<&dyn Locatable> = vec![&code];
        let Ok(html) = renderer.render(MapMode::Pin, "code", &records) else {
            panic!("render failed");
        };
        assert!(html.contains("data:image/png;base64,iVBORw=="));
        assert!(html.contains("Front door"));
        assert!(html.contains("setView([48.5,2.25], 3)"));
    }
}
