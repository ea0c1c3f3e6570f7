//! Catalog data model
//!
//! The record types produced by a scrape run and consumed by the
//! reconciliation engine. Snapshot records are write-once per run and
//! read-many afterward.

mod reference;

pub use reference::{PurchaseOption, ReferenceCatalogItem};

use crate::names::{normalize, NameKey};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn is_false(b: &bool) -> bool {
    !*b
}

/// One extracted listing item.
///
/// Numeric fields default to zero rather than being absent; the source
/// pages conflate "field missing" with "value is zero". The `*_missing`
/// flags carry that distinction internally and are only serialized when
/// set, so well-formed items keep the legacy on-disk shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub discount_percent: u8,

    #[serde(default, skip_serializing_if = "is_false")]
    pub price_missing: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub discount_missing: bool,
}

impl CatalogEntry {
    /// Creates an undiscounted entry at a single price.
    pub fn at_price(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            original_price: price,
            discount_percent: 0,
            price_missing: false,
            discount_missing: false,
        }
    }

    /// Canonical join key for this entry's name.
    pub fn name_key(&self) -> NameKey {
        normalize(&self.name)
    }
}

/// The complete result of one pagination run over one retailer.
///
/// Created atomically when the run reaches its terminal state and immutable
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerSnapshot {
    pub retailer: String,
    pub captured_at: DateTime<Utc>,
    pub entries: Vec<CatalogEntry>,
}

impl RetailerSnapshot {
    /// Distinct canonical name keys across all entries.
    pub fn name_keys(&self) -> HashSet<NameKey> {
        self.entries.iter().map(CatalogEntry::name_key).collect()
    }
}

/// One title inside a bundle, read from the gallery carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleGame {
    pub name: String,
    pub developer: String,
}

/// A bundle SKU collected from the gallery branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub price: Decimal,
    pub active_until: String,
    pub games: Vec<BundleGame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_at_price_is_undiscounted() {
        let entry = CatalogEntry::at_price("Foo", dec("4.99"));
        assert_eq!(entry.price, entry.original_price);
        assert_eq!(entry.discount_percent, 0);
        assert!(!entry.price_missing);
    }

    #[test]
    fn test_missing_flags_skipped_when_unset() {
        let entry = CatalogEntry::at_price("Foo", dec("4.99"));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("price_missing"));
        assert!(!json.contains("discount_missing"));
    }

    #[test]
    fn test_missing_flags_serialized_when_set() {
        let entry = CatalogEntry {
            discount_missing: true,
            ..CatalogEntry::at_price("Foo", Decimal::ZERO)
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("discount_missing"));
        assert!(!json.contains("price_missing"));
    }

    #[test]
    fn test_legacy_records_without_flags_deserialize() {
        let json = r#"{"name":"Foo","price":"9.99","original_price":"19.99","discount_percent":50}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.price_missing);
        assert_eq!(entry.discount_percent, 50);
    }

    #[test]
    fn test_snapshot_name_keys_are_canonical_and_distinct() {
        let snapshot = RetailerSnapshot {
            retailer: "test".to_string(),
            captured_at: Utc::now(),
            entries: vec![
                CatalogEntry::at_price("Foo  Bar", Decimal::ZERO),
                CatalogEntry::at_price("FOO BAR", Decimal::ZERO),
                CatalogEntry::at_price("Baz", Decimal::ZERO),
            ],
        };
        let keys = snapshot.name_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("foo bar"));
        assert!(keys.contains("baz"));
    }
}
