//! Reconciliation set computations
//!
//! Pure batch computations over canonicalized name sets. Given identical
//! inputs the outputs are fully deterministic; display ordering is pinned
//! by sorting at the report stage.

use crate::catalog::{CatalogEntry, ReferenceCatalogItem};
use crate::names::{normalize, NameKey};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Canonical keys for every reference item name and every purchase-option
/// name.
pub fn reference_keys(items: &[ReferenceCatalogItem]) -> HashSet<NameKey> {
    let mut keys = HashSet::new();
    for item in items {
        keys.insert(normalize(&item.name));
        for option in &item.purchase_options {
            keys.insert(normalize(&option.option_name));
        }
    }
    keys
}

/// Distinct canonical keys across one snapshot's entries.
pub fn snapshot_keys(entries: &[CatalogEntry]) -> HashSet<NameKey> {
    entries.iter().map(|e| normalize(&e.name)).collect()
}

/// Retailer titles absent from the reference catalog, sorted for display.
pub fn missing_from_reference(
    retailer_keys: &HashSet<NameKey>,
    reference_keys: &HashSet<NameKey>,
) -> Vec<NameKey> {
    let mut missing: Vec<NameKey> = retailer_keys
        .difference(reference_keys)
        .cloned()
        .collect();
    missing.sort();
    missing
}

/// Canonical names produced by more than one distinct reference id, via
/// the item name or any purchase-option name. A reused name signals
/// bundling or re-release ambiguity in the reference catalog itself.
pub fn reused_names(items: &[ReferenceCatalogItem]) -> BTreeMap<NameKey, BTreeSet<i64>> {
    let mut ids_by_key: BTreeMap<NameKey, BTreeSet<i64>> = BTreeMap::new();
    for item in items {
        ids_by_key
            .entry(normalize(&item.name))
            .or_default()
            .insert(item.id);
        for option in &item.purchase_options {
            ids_by_key
                .entry(normalize(&option.option_name))
                .or_default()
                .insert(item.id);
        }
    }
    ids_by_key.retain(|_, ids| ids.len() > 1);
    ids_by_key
}
