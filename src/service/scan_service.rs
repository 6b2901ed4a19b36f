//! Scan recorder: attaches scan events to existing codes.

use std::sync::Arc;

use crate::domain::{CodeIdentifier, NewScanEvent, ScanEvent, ScanReport, TimeWindow};
use crate::error::ScanmapError;
use crate::persistence::Store;

/// Records and queries scan events.
///
/// Every operation resolves the owning code first, so unknown identifiers
/// surface as [`ScanmapError::CodeNotFound`] and no orphan is ever written.
#[derive(Debug, Clone)]
pub struct ScanService {
    store: Arc<dyn Store>,
}

impl ScanService {
    /// Creates a new `ScanService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn ensure_code(&self, identifier: CodeIdentifier) -> Result<(), ScanmapError> {
        match self.store.get_code(identifier).await? {
            Some(_) => Ok(()),
            None => Err(ScanmapError::CodeNotFound(identifier)),
        }
    }

    /// Records one scan of `identifier`.
    ///
    /// The store assigns `recorded_at`; repeated calls create distinct
    /// events.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
    pub async fn record(
        &self,
        identifier: CodeIdentifier,
        report: ScanReport,
    ) -> Result<ScanEvent, ScanmapError> {
        self.ensure_code(identifier).await?;
        let event = self
            .store
            .insert_scan(NewScanEvent::new(identifier, report))
            .await?;
        tracing::info!(
            %identifier,
            scan_id = event.id,
            located = event.location.is_some(),
            "scan recorded"
        );
        Ok(event)
    }

    /// Lists the scans of `identifier` inside `window`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
    pub async fn list_for_code(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<Vec<ScanEvent>, ScanmapError> {
        self.ensure_code(identifier).await?;
        self.store.list_scans(identifier, window).await
    }

    /// Counts the scans of `identifier` inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
    pub async fn count(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<u64, ScanmapError> {
        self.ensure_code(identifier).await?;
        self.store.count_scans(identifier, window).await
    }

    /// Deletes every scan of `identifier`, keeping the code.
    ///
    /// Returns the number removed; zero is a success.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if the code does not exist.
    pub async fn delete_all_for_code(&self, identifier: CodeIdentifier) -> Result<u64, ScanmapError> {
        self.ensure_code(identifier).await?;
        let removed = self.store.delete_scans(identifier).await?;
        tracing::info!(%identifier, removed, "scans deleted");
        Ok(removed)
    }
}
