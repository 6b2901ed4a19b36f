//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EmbeddingPolicy, IdentifierGenerator, RandomIdentifierGenerator};
use crate::error::ScanmapError;
use crate::map::MapRenderer;
use crate::persistence::Store;
use crate::service::{CodeService, MapService, ScanService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Code creation and lookup.
    pub code_service: Arc<CodeService>,
    /// Scan recording and queries.
    pub scan_service: Arc<ScanService>,
    /// Map rendering.
    pub map_service: Arc<MapService>,
}

impl AppState {
    /// Wires every service over one store with random identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::Internal`] if the map templates fail to load.
    pub fn new(store: Arc<dyn Store>, embedding: EmbeddingPolicy) -> Result<Self, ScanmapError> {
        Self::with_generator(store, Arc::new(RandomIdentifierGenerator), embedding)
    }

    /// Wires every service with an explicit identifier generator.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::Internal`] if the map templates fail to load.
    pub fn with_generator(
        store: Arc<dyn Store>,
        generator: Arc<dyn IdentifierGenerator>,
        embedding: EmbeddingPolicy,
    ) -> Result<Self, ScanmapError> {
        let renderer = Arc::new(MapRenderer::new()?);
        Ok(Self {
            code_service: Arc::new(CodeService::new(Arc::clone(&store), generator, embedding)),
            scan_service: Arc::new(ScanService::new(Arc::clone(&store))),
            map_service: Arc::new(MapService::new(store, renderer)),
        })
    }
}
