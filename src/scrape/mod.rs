//! Scraping module: pagination, extraction, and gallery walking
//!
//! This module contains the paginated extraction engine:
//! - The per-run pagination state machine and its termination policies
//! - Per-retailer extraction strategies (selector tables + item shapes)
//! - The cycle-detecting carousel walker for the bundle gallery branch

mod bundles;
mod carousel;
mod controller;
mod run_state;
mod strategy;

pub use bundles::{collect_bundles, GalleryPlan};
pub use carousel::{CarouselSelectors, CarouselWalker};
pub use controller::{
    ListingPlan, PaginationController, SettleDelay, TerminationKind, TerminationPolicy,
};
pub use run_state::RunState;
pub use strategy::{extract_items, ItemShape, ListingSelectors};
