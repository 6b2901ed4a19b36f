//! Map service: gathers a code's located records and renders them.

use std::sync::Arc;

use crate::domain::{CodeIdentifier, Locatable, TimeWindow};
use crate::error::ScanmapError;
use crate::map::{MapDocument, MapMode, MapRenderer};
use crate::persistence::Store;

/// Builds map documents for a single code and its scans.
#[derive(Debug, Clone)]
pub struct MapService {
    store: Arc<dyn Store>,
    renderer: Arc<MapRenderer>,
}

impl MapService {
    /// Creates a new `MapService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, renderer: Arc<MapRenderer>) -> Self {
        Self { store, renderer }
    }

    /// Renders the code (if created inside `window`) followed by its scans
    /// inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] for an unknown identifier and
    /// [`ScanmapError::EmptyDataset`] when nothing in the window has a
    /// location.
    pub async fn render_for_code(
        &self,
        identifier: CodeIdentifier,
        mode: MapMode,
        window: TimeWindow,
    ) -> Result<MapDocument, ScanmapError> {
        let code = self
            .store
            .get_code(identifier)
            .await?
            .ok_or(ScanmapError::CodeNotFound(identifier))?;
        let scans = self.store.list_scans(identifier, window).await?;

        let mut records: Vec<&dyn Locatable> = Vec::with_capacity(scans.len() + 1);
        if window.contains(code.created_at) {
            records.push(&code);
        }
        records.extend(scans.iter().map(|scan| scan as &dyn Locatable));

        let title = format!("{} ({mode})", code.display_name());
        let html = self.renderer.render(mode, &title, &records)?;

        tracing::info!(%identifier, %mode, scans = scans.len(), "map rendered");
        Ok(MapDocument {
            filename: format!("map_{identifier}_{mode}.html"),
            html,
        })
    }
}
