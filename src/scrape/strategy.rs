//! Per-retailer extraction strategies
//!
//! A strategy is pure data: an [`ItemShape`] picking one of two catalog
//! layouts, plus a [`ListingSelectors`] table naming where the fields live.
//! Extraction itself is shared. A missing name is a structural fault (the
//! page layout changed); missing numeric sub-fields are data gaps and
//! degrade to zero.

use crate::catalog::CatalogEntry;
use crate::fields;
use crate::render::{DriverResult, RenderNode};
use crate::{Result, SyncError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The two supported catalog layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemShape {
    /// A single current-price field; a struck-through original price, when
    /// present, marks the item as discounted.
    Simple,

    /// Independent price and discount text fields with no conditional
    /// structure.
    Flat,
}

/// Selector table for one retailer's listing page.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// Container selector for one item-shaped node.
    pub item: String,

    /// Name sub-field. Required on every item.
    pub name: String,

    /// Current-price sub-field.
    pub price: Option<String>,

    /// Discount text sub-field (flat shape).
    pub discount: Option<String>,

    /// Struck-through original-price sub-field (simple shape).
    pub original_price: Option<String>,

    /// Savings-percentage sub-field (simple shape).
    pub savings: Option<String>,

    /// The "next page" control.
    pub next: String,
}

/// Text of an optional sub-field, or `None` when the selector is not
/// configured or nothing matches.
async fn field_text<N: RenderNode>(
    node: &N,
    selector: &Option<String>,
) -> DriverResult<Option<String>> {
    match selector {
        Some(sel) => match node.query(sel).await? {
            Some(found) => Ok(Some(found.text().await?)),
            None => Ok(None),
        },
        None => Ok(None),
    }
}

/// Discount percentage implied by a struck price when no savings field is
/// present.
fn computed_discount(price: Decimal, original: Decimal) -> u8 {
    if original.is_zero() || price >= original {
        return 0;
    }
    let percent = (Decimal::ONE - price / original) * Decimal::from(100);
    percent.round().to_u8().unwrap_or(100).min(100)
}

/// Converts one rendered page's item nodes into catalog entries.
pub async fn extract_items<N: RenderNode>(
    shape: ItemShape,
    selectors: &ListingSelectors,
    discount_prefix: &str,
    nodes: &[N],
    retailer: &str,
) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::with_capacity(nodes.len());
    for node in nodes {
        entries.push(extract_item(shape, selectors, discount_prefix, node, retailer).await?);
    }
    Ok(entries)
}

async fn extract_item<N: RenderNode>(
    shape: ItemShape,
    selectors: &ListingSelectors,
    discount_prefix: &str,
    node: &N,
    retailer: &str,
) -> Result<CatalogEntry> {
    // Name absence indicates a structural page change, not a data gap
    let name_node = node
        .query(&selectors.name)
        .await?
        .ok_or_else(|| SyncError::Structural {
            retailer: retailer.to_string(),
            selector: selectors.name.clone(),
        })?;
    let name = name_node.text().await?;

    let price_text = field_text(node, &selectors.price).await?;
    let price_value = price_text.as_deref().and_then(fields::price_value);
    let price = price_value.unwrap_or_default();
    let price_missing = price_value.is_none();

    match shape {
        ItemShape::Flat => {
            let discount_text = field_text(node, &selectors.discount).await?;
            let discount_value = discount_text
                .as_deref()
                .and_then(|t| fields::discount_value(t, discount_prefix));
            Ok(CatalogEntry {
                name,
                price,
                original_price: price,
                discount_percent: discount_value.unwrap_or(0),
                price_missing,
                discount_missing: discount_value.is_none(),
            })
        }

        ItemShape::Simple => {
            match field_text(node, &selectors.original_price).await? {
                Some(struck_text) => {
                    let mut original_price = fields::parse_price(&struck_text);
                    // The struck price is never below the current price
                    if original_price < price {
                        original_price = price;
                    }
                    let savings_text = field_text(node, &selectors.savings).await?;
                    let discount_percent = savings_text
                        .as_deref()
                        .and_then(|t| fields::discount_value(t, ""))
                        .unwrap_or_else(|| computed_discount(price, original_price));
                    Ok(CatalogEntry {
                        name,
                        price,
                        original_price,
                        discount_percent,
                        price_missing,
                        discount_missing: false,
                    })
                }
                // No struck price: the single price field is the original,
                // undiscounted price
                None => Ok(CatalogEntry {
                    name,
                    price,
                    original_price: price,
                    discount_percent: 0,
                    price_missing,
                    discount_missing: false,
                }),
            }
        }
    }
}
