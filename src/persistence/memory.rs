//! In-process store with per-code fine-grained locking.
//!
//! [`MemoryStore`] keeps all codes in a `HashMap` where each entry is
//! individually protected by a [`tokio::sync::RwLock`]. Scans against
//! different codes proceed concurrently under the outer read lock; creating
//! or deleting a code takes the outer write lock, which makes cascade
//! deletion atomic.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::domain::{Code, CodeIdentifier, NewCode, NewScanEvent, ScanEvent, TimeWindow};
use crate::error::ScanmapError;

/// A code together with the scans it owns.
#[derive(Debug)]
struct CodeEntry {
    code: Code,
    scans: Vec<ScanEvent>,
}

/// Central in-memory store for codes and their scan events.
///
/// # Concurrency
///
/// - Reads of the same code are concurrent.
/// - Scan inserts on different codes are concurrent.
/// - Scan inserts on the same code are serialized by that code's lock.
/// - Code insert and delete are serialized against everything else.
#[derive(Debug)]
pub struct MemoryStore {
    codes: RwLock<HashMap<CodeIdentifier, Arc<RwLock<CodeEntry>>>>,
    next_code_id: AtomicI64,
    next_scan_id: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codes: RwLock::new(HashMap::new()),
            next_code_id: AtomicI64::new(1),
            next_scan_id: AtomicI64::new(1),
        }
    }

    /// Returns the number of codes in the store.
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    /// Returns `true` if the store contains no codes.
    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }

    /// Total number of scan events across all codes.
    pub async fn scan_total(&self) -> usize {
        let map = self.codes.read().await;
        let mut total = 0;
        for entry in map.values() {
            total += entry.read().await.scans.len();
        }
        total
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_code(&self, code: NewCode) -> Result<Code, ScanmapError> {
        let identifier = code.identifier;
        let mut map = self.codes.write().await;
        if map.contains_key(&identifier) {
            return Err(ScanmapError::IdentifierCollision(identifier));
        }
        let id = self.next_code_id.fetch_add(1, Ordering::Relaxed);
        let code = code.into_code(id, Utc::now());
        map.insert(
            identifier,
            Arc::new(RwLock::new(CodeEntry {
                code: code.clone(),
                scans: Vec::new(),
            })),
        );
        Ok(code)
    }

    async fn get_code(&self, identifier: CodeIdentifier) -> Result<Option<Code>, ScanmapError> {
        let map = self.codes.read().await;
        let Some(entry) = map.get(&identifier) else {
            return Ok(None);
        };
        Ok(Some(entry.read().await.code.clone()))
    }

    async fn list_codes(&self) -> Result<Vec<Code>, ScanmapError> {
        let map = self.codes.read().await;
        let mut codes = Vec::with_capacity(map.len());
        for entry in map.values() {
            codes.push(entry.read().await.code.clone());
        }
        codes.sort_by_key(|code| code.id);
        Ok(codes)
    }

    async fn delete_code(&self, identifier: CodeIdentifier) -> Result<Option<u64>, ScanmapError> {
        let mut map = self.codes.write().await;
        let Some(entry) = map.remove(&identifier) else {
            return Ok(None);
        };
        let removed = entry.read().await.scans.len();
        Ok(Some(removed as u64))
    }

    async fn insert_scan(&self, scan: NewScanEvent) -> Result<ScanEvent, ScanmapError> {
        // Hold the outer read lock for the whole insert so a concurrent
        // delete_code cannot leave an orphan behind.
        let map = self.codes.read().await;
        let entry = map
            .get(&scan.code_ref)
            .ok_or(ScanmapError::CodeNotFound(scan.code_ref))?;
        let mut entry = entry.write().await;
        let id = self.next_scan_id.fetch_add(1, Ordering::Relaxed);
        let event = scan.into_event(id, Utc::now());
        entry.scans.push(event.clone());
        Ok(event)
    }

    async fn list_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<Vec<ScanEvent>, ScanmapError> {
        let map = self.codes.read().await;
        let Some(entry) = map.get(&identifier) else {
            return Ok(Vec::new());
        };
        let entry = entry.read().await;
        Ok(window.filter(&entry.scans).into_iter().cloned().collect())
    }

    async fn count_scans(
        &self,
        identifier: CodeIdentifier,
        window: TimeWindow,
    ) -> Result<u64, ScanmapError> {
        let map = self.codes.read().await;
        let Some(entry) = map.get(&identifier) else {
            return Ok(0);
        };
        let count = window.count(&entry.read().await.scans);
        Ok(count as u64)
    }

    async fn delete_scans(&self, identifier: CodeIdentifier) -> Result<u64, ScanmapError> {
        let map = self.codes.read().await;
        let Some(entry) = map.get(&identifier) else {
            return Ok(0);
        };
        let mut entry = entry.write().await;
        let removed = entry.scans.len();
        entry.scans.clear();
        Ok(removed as u64)
    }
}
