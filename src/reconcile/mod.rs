//! Cross-catalog reconciliation
//!
//! Loads a reference catalog and one or more retailer snapshots, joins
//! them on canonical name keys, and produces a [`ReconcileReport`] listing
//! titles missing from the reference and reference names reused across
//! distinct ids.

mod engine;
mod report;

pub use engine::{missing_from_reference, reference_keys, reused_names, snapshot_keys};
pub use report::{print_report, ReconcileReport, RetailerDiff, ReusedName};

use crate::catalog::{CatalogEntry, ReferenceCatalogItem};
use crate::store;
use crate::{Result, SyncError};
use chrono::Utc;
use std::path::Path;

fn input_error(path: &Path, message: impl std::fmt::Display) -> SyncError {
    SyncError::ReconcileInput {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Loads the reference catalog from a JSON array document.
pub fn load_reference(path: &Path) -> Result<Vec<ReferenceCatalogItem>> {
    let items: Vec<ReferenceCatalogItem> =
        store::read_document(path).map_err(|e| input_error(path, e))?;
    tracing::info!(items = items.len(), "reference catalog loaded");
    Ok(items)
}

/// Loads one snapshot page file and labels it with its retailer.
///
/// Page files live in per-retailer directories, so the label is the parent
/// directory name; a bare file falls back to its stem.
pub fn load_snapshot(path: &Path) -> Result<(String, Vec<CatalogEntry>)> {
    let entries = store::read_snapshot_pages(path).map_err(|e| input_error(path, e))?;
    let label = path
        .parent()
        .and_then(|p| p.file_name())
        .or_else(|| path.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| input_error(path, "cannot derive a retailer label"))?;
    Ok((label, entries))
}

/// Reconciles retailer snapshots against the reference catalog.
pub fn reconcile(
    reference: &[ReferenceCatalogItem],
    snapshots: &[(String, Vec<CatalogEntry>)],
) -> ReconcileReport {
    let reference_set = engine::reference_keys(reference);

    let mut retailers = Vec::new();
    for (retailer, entries) in snapshots {
        let keys = engine::snapshot_keys(entries);
        let missing = engine::missing_from_reference(&keys, &reference_set);
        tracing::info!(
            retailer = %retailer,
            titles = keys.len(),
            missing = missing.len(),
            "retailer reconciled"
        );
        retailers.push(RetailerDiff {
            retailer: retailer.clone(),
            snapshot_titles: keys.len(),
            missing_from_reference: missing,
        });
    }
    retailers.sort_by(|a, b| a.retailer.cmp(&b.retailer));

    let reused = engine::reused_names(reference)
        .into_iter()
        .map(|(key, ids)| ReusedName {
            key,
            ids: ids.into_iter().collect(),
        })
        .collect();

    ReconcileReport {
        generated_at: Utc::now(),
        reference_titles: reference_set.len(),
        retailers,
        reused_names: reused,
    }
}
