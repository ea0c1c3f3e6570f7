//! In-memory snapshot sink for tests

use crate::catalog::{CatalogEntry, RetailerSnapshot};
use crate::store::traits::{SnapshotSink, StoreResult};

/// Collects appended pages in memory, preserving page boundaries.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pages: Vec<Vec<CatalogEntry>>,
    pub finished: Option<RetailerSnapshot>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended entries flattened in page order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.pages.iter().flatten().cloned().collect()
    }
}

impl SnapshotSink for MemorySink {
    fn append_page(&mut self, entries: &[CatalogEntry]) -> StoreResult<()> {
        self.pages.push(entries.to_vec());
        Ok(())
    }

    fn finish(&mut self, snapshot: &RetailerSnapshot) -> StoreResult<()> {
        self.finished = Some(snapshot.clone());
        Ok(())
    }
}
