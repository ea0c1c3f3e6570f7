//! Persistence collaborator
//!
//! Snapshots land on disk as line-delimited JSON arrays, one array per
//! page, flushed per page so an interrupted run is recoverable up to its
//! last complete page. Reference catalogs, bundle collections, and
//! reconciliation reports are single JSON documents. The core only knows
//! "append one page-array" and "write one final document"; directory
//! layout lives entirely in this module.

mod jsonl;
mod memory;
mod traits;

pub use jsonl::{read_document, read_snapshot_pages, write_document, JsonlSink};
pub use memory::MemorySink;
pub use traits::{SnapshotSink, StoreError, StoreResult};
