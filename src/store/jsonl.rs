//! File-backed snapshot store
//!
//! Layout: one directory per retailer under the snapshot root, one
//! `<operation>_<epoch>.jsonl` file per run, one JSON array per line per
//! page, plus a `.meta.json` sidecar written at the end of the run with the
//! capture timestamp and page/item counts.

use crate::catalog::{CatalogEntry, RetailerSnapshot};
use crate::store::traits::{SnapshotSink, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Run summary written next to the page file when a run completes.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunMeta {
    pub retailer: String,
    pub captured_at: DateTime<Utc>,
    pub pages: usize,
    pub items: usize,
}

/// A snapshot sink appending page arrays to a JSONL file.
pub struct JsonlSink {
    writer: BufWriter<File>,
    path: PathBuf,
    pages: usize,
}

impl JsonlSink {
    /// Creates the retailer directory and opens a fresh run file.
    pub fn create(snapshot_dir: &Path, retailer: &str, operation: &str) -> StoreResult<Self> {
        let dir = snapshot_dir.join(retailer);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}_{}.jsonl", operation, Utc::now().timestamp()));
        let file = File::create(&path)?;
        tracing::info!("Writing snapshot pages to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            pages: 0,
        })
    }

    /// Path of the page file this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn meta_path(&self) -> PathBuf {
        self.path.with_extension("meta.json")
    }
}

impl SnapshotSink for JsonlSink {
    fn append_page(&mut self, entries: &[CatalogEntry]) -> StoreResult<()> {
        let line = serde_json::to_string(entries)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        // One flush per page keeps partial runs recoverable
        self.writer.flush()?;
        self.pages += 1;
        Ok(())
    }

    fn finish(&mut self, snapshot: &RetailerSnapshot) -> StoreResult<()> {
        self.writer.flush()?;
        let meta = RunMeta {
            retailer: snapshot.retailer.clone(),
            captured_at: snapshot.captured_at,
            pages: self.pages,
            items: snapshot.entries.len(),
        };
        write_document(&self.meta_path(), &meta)
    }
}

/// Writes a single JSON document, creating parent directories as needed.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Reads a single JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Reads a page file back into a flat entry sequence, preserving page
/// order. Each non-empty line must be a JSON array of entries.
pub fn read_snapshot_pages(path: &Path) -> StoreResult<Vec<CatalogEntry>> {
    let content = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let page: Vec<CatalogEntry> =
            serde_json::from_str(line).map_err(|e| StoreError::MalformedSnapshot {
                path: path.display().to_string(),
                line: index + 1,
                message: e.to_string(),
            })?;
        entries.extend(page);
    }
    Ok(entries)
}
