//! Reference catalog records
//!
//! The reference catalog is the canonical storefront's product list,
//! loaded once per reconciliation run and treated as read-only ground
//! truth. Serde aliases accept the upstream feed's original field names.

use serde::{Deserialize, Serialize};

/// A named way to buy a given reference item (e.g. a bundle SKU).
///
/// `option_name` is comparable against retailer item names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOption {
    #[serde(alias = "purchase_option_name")]
    pub option_name: String,

    #[serde(default, alias = "packageid")]
    pub package_id: Option<i64>,

    #[serde(default, alias = "bundleid")]
    pub bundle_id: Option<i64>,
}

/// One release in the reference catalog.
///
/// `id` uniquely identifies a release; `name` is not guaranteed unique
/// across items, which is exactly what the reused-name detector reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceCatalogItem {
    pub name: String,

    #[serde(alias = "appid")]
    pub id: i64,

    #[serde(default)]
    pub developers: String,

    #[serde(default)]
    pub publishers: String,

    #[serde(default)]
    pub release_date: i64,

    #[serde(default)]
    pub purchase_options: Vec<PurchaseOption>,
}
