use crate::scrape::{
    CarouselSelectors, GalleryPlan, ItemShape, ListingPlan, ListingSelectors, SettleDelay,
    TerminationKind, TerminationPolicy,
};
use crate::{Result, SyncError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for shelfdiff
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub retailer: Vec<RetailerConfig>,
    #[serde(default)]
    pub bundles: Option<BundlesConfig>,
}

/// Shared scraping behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Address of the WebDriver endpoint driving the browser
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Base time to wait after each navigation for rendering (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Uniform random jitter added on top of the base delay (milliseconds)
    #[serde(rename = "settle-jitter-ms")]
    pub settle_jitter_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding per-retailer snapshot page files
    #[serde(rename = "snapshot-dir")]
    pub snapshot_dir: String,

    /// Path to the reconciliation report JSON document
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Path to the bundle collection JSON document
    #[serde(rename = "bundles-path")]
    pub bundles_path: String,
}

/// Reconciliation inputs
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Path to the reference catalog JSON document
    #[serde(rename = "reference-path")]
    pub reference_path: String,
}

/// One retailer's listing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetailerConfig {
    /// Retailer name, used for snapshot directories and log context
    pub name: String,

    /// Catalog layout of one listing item
    pub shape: ItemShape,

    /// How a run decides that no further page exists
    pub termination: TerminationKind,

    /// Sentinel href carried by the disabled "next" control
    /// (explicit-disabled termination only)
    #[serde(rename = "disabled-next-href")]
    pub disabled_next_href: Option<String>,

    /// Label prefix stripped from discount text before parsing
    #[serde(rename = "discount-prefix", default)]
    pub discount_prefix: String,

    pub selectors: SelectorConfig,

    /// Listing URLs by operation name (e.g. `full`, `sale`)
    pub operations: BTreeMap<String, String>,
}

/// Selector table for one retailer, as written in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    pub item: String,
    pub name: String,
    pub price: Option<String>,
    pub discount: Option<String>,
    #[serde(rename = "original-price")]
    pub original_price: Option<String>,
    pub savings: Option<String>,
    pub next: String,
}

/// Bundle gallery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BundlesConfig {
    pub url: String,
    #[serde(rename = "link-selector")]
    pub link_selector: String,
    #[serde(rename = "title-selector")]
    pub title_selector: String,
    #[serde(rename = "ends-selector")]
    pub ends_selector: String,
    #[serde(rename = "price-selector")]
    pub price_selector: String,
    #[serde(rename = "carousel-container")]
    pub carousel_container: Option<String>,
    #[serde(rename = "active-name")]
    pub active_name: String,
    #[serde(rename = "active-developer")]
    pub active_developer: String,
    #[serde(rename = "next-control")]
    pub next_control: String,
}

impl Config {
    /// Settle delay shared by every run under this configuration.
    pub fn settle_delay(&self) -> SettleDelay {
        SettleDelay::from_millis(self.scraper.settle_delay_ms, self.scraper.settle_jitter_ms)
    }

    /// Finds a retailer by name.
    pub fn retailer(&self, name: &str) -> Result<&RetailerConfig> {
        self.retailer
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| SyncError::UnknownRetailer(name.to_string()))
    }

    /// Builds the gallery plan, if a `[bundles]` section is configured.
    pub fn gallery_plan(&self) -> Result<GalleryPlan> {
        let bundles = self
            .bundles
            .as_ref()
            .ok_or(SyncError::BundlesNotConfigured)?;
        Ok(GalleryPlan {
            url: bundles.url.clone(),
            link_selector: bundles.link_selector.clone(),
            title_selector: bundles.title_selector.clone(),
            ends_selector: bundles.ends_selector.clone(),
            price_selector: bundles.price_selector.clone(),
            carousel: CarouselSelectors {
                container: bundles.carousel_container.clone(),
                active_name: bundles.active_name.clone(),
                active_developer: bundles.active_developer.clone(),
                next_control: bundles.next_control.clone(),
            },
            delay: self.settle_delay(),
        })
    }
}

impl RetailerConfig {
    /// Builds the listing plan for one configured operation.
    pub fn listing_plan(&self, operation: &str, delay: SettleDelay) -> Result<ListingPlan> {
        let start_url =
            self.operations
                .get(operation)
                .ok_or_else(|| SyncError::UnknownOperation {
                    retailer: self.name.clone(),
                    operation: operation.to_string(),
                })?;

        let policy = match self.termination {
            TerminationKind::ExplicitDisabled => TerminationPolicy::ExplicitDisabled {
                selector: self.selectors.next.clone(),
                // Validation guarantees the sentinel href is present
                disabled_href: self.disabled_next_href.clone().unwrap_or_default(),
            },
            TerminationKind::Probe => TerminationPolicy::Probe {
                selector: self.selectors.next.clone(),
            },
        };

        Ok(ListingPlan {
            retailer: self.name.clone(),
            start_url: start_url.clone(),
            shape: self.shape,
            selectors: ListingSelectors {
                item: self.selectors.item.clone(),
                name: self.selectors.name.clone(),
                price: self.selectors.price.clone(),
                discount: self.selectors.discount.clone(),
                original_price: self.selectors.original_price.clone(),
                savings: self.selectors.savings.clone(),
                next: self.selectors.next.clone(),
            },
            discount_prefix: self.discount_prefix.clone(),
            policy,
            delay,
        })
    }
}
