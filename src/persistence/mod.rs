//! Persistence layer: the [`Store`] boundary and its backends.
//!
//! The core talks to storage only through [`Store`]. Every method is a
//! single atomic operation. [`MemoryStore`] keeps everything in process
//! (default backend, used by tests); [`PostgresStore`] uses `sqlx::PgPool`.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::domain::{Code, CodeIdentifier, NewCode, NewScanEvent, ScanEvent, TimeWindow};
use crate::error::ScanmapError;

/// Storage collaborator for codes and scan events.
///
/// Implementations own surrogate keys and server timestamps: `id` and
/// `created_at` on insert of a code, `id` and `recorded_at` on insert of a
/// scan.
#[async_trait]
pub trait Store: std::fmt::Debug + Send + Sync {
    /// Persists a new code.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::IdentifierCollision`] if the identifier is
    /// already taken, or [`ScanmapError::PersistenceError`] on backend
    /// failure.
    async fn insert_code(&self, code: NewCode) -> Result<Code, ScanmapError>;

    /// Fetches a code by its public identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn get_code(&self, identifier: CodeIdentifier) -> Result<Option<Code>, ScanmapError>;

    /// Returns every code ordered by surrogate key.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn list_codes(&self) -> Result<Vec<Code>, ScanmapError>;

    /// Deletes a code and all of its scan events atomically.
    ///
    /// Returns the number of scan events removed, or `None` if the code did
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn delete_code(&self, identifier: CodeIdentifier) -> Result<Option<u64>, ScanmapError>;

    /// Persists a scan event, stamping `recorded_at` with the server clock.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::CodeNotFound`] if the owning code does not
    /// exist, or [`ScanmapError::PersistenceError`] on backend failure.
    async fn insert_scan(&self, scan: NewScanEvent) -> Result<ScanEvent, ScanmapError>;

    /// Lists the scan events of a code inside `window`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn list_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<Vec<ScanEvent>, ScanmapError>;

    /// Counts the scan events of a code inside `window`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn count_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<u64, ScanmapError>;

    /// Deletes every scan event of a code, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ScanmapError::PersistenceError`] on backend failure.
    async fn delete_scans(&self, identifier: CodeIdentifier) -> Result<u64, ScanmapError>;
}
