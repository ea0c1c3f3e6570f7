//! Reconciliation report
//!
//! The serializable output of one reconciliation run plus a formatted
//! stdout summary. All collections are sorted before serialization so a
//! report is byte-stable for a given set of inputs.

use crate::names::NameKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One retailer's side of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerDiff {
    pub retailer: String,

    /// Distinct canonical titles in this retailer's snapshot.
    pub snapshot_titles: usize,

    /// Sorted canonical titles absent from the reference catalog.
    pub missing_from_reference: Vec<NameKey>,
}

/// A canonical name that maps to more than one reference id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReusedName {
    pub key: NameKey,
    pub ids: Vec<i64>,
}

/// The complete result of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub generated_at: DateTime<Utc>,

    /// Distinct canonical keys in the reference catalog, purchase-option
    /// names included.
    pub reference_titles: usize,

    pub retailers: Vec<RetailerDiff>,
    pub reused_names: Vec<ReusedName>,
}

/// Prints a report summary to stdout in a formatted manner
pub fn print_report(report: &ReconcileReport) {
    println!("=== Reconciliation Report ===\n");

    println!("Overview:");
    println!("  Reference titles: {}", report.reference_titles);
    println!("  Retailers compared: {}", report.retailers.len());
    println!();

    for diff in &report.retailers {
        println!(
            "{}: {} titles, {} missing from reference",
            diff.retailer,
            diff.snapshot_titles,
            diff.missing_from_reference.len()
        );
        for name in &diff.missing_from_reference {
            println!("  - {}", name);
        }
        println!();
    }

    if !report.reused_names.is_empty() {
        println!("Reused Names ({}):", report.reused_names.len());
        for reused in &report.reused_names {
            let ids: Vec<String> = reused.ids.iter().map(|id| id.to_string()).collect();
            println!("  {} -> [{}]", reused.key, ids.join(", "));
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_round_trip() {
        let report = ReconcileReport {
            generated_at: Utc::now(),
            reference_titles: 2,
            retailers: vec![RetailerDiff {
                retailer: "shop".to_string(),
                snapshot_titles: 3,
                missing_from_reference: vec!["baz".to_string()],
            }],
            reused_names: vec![ReusedName {
                key: "goty edition".to_string(),
                ids: vec![1, 2],
            }],
        };

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: ReconcileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.retailers[0].missing_from_reference, vec!["baz"]);
        assert_eq!(back.reused_names[0].ids, vec![1, 2]);
    }
}
