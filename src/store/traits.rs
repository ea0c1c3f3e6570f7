//! Storage trait and error types

use crate::catalog::{CatalogEntry, RetailerSnapshot};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed snapshot {path} (line {line}): {message}")]
    MalformedSnapshot {
        path: String,
        line: usize,
        message: String,
    },
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Receives the output of one pagination run.
///
/// `append_page` is called once per extracted page, in page order, and must
/// make that page durable before returning so partial runs stay
/// recoverable. `finish` is called exactly once, after the run reaches its
/// terminal state.
pub trait SnapshotSink {
    fn append_page(&mut self, entries: &[CatalogEntry]) -> StoreResult<()>;

    fn finish(&mut self, snapshot: &RetailerSnapshot) -> StoreResult<()>;
}
