//! Shelfdiff: a storefront catalog scraper and price reconciler
//!
//! This crate walks paginated game-retailer listings through a rendering
//! collaborator (a WebDriver session), extracts per-item price records with
//! zero-default field parsing, and reconciles the resulting name sets
//! against a reference catalog to surface missing titles and reused names.

pub mod catalog;
pub mod config;
pub mod fields;
pub mod names;
pub mod reconcile;
pub mod render;
pub mod scrape;
pub mod store;

use thiserror::Error;

/// Main error type for shelfdiff operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rendering error: {0}")]
    Driver(#[from] render::DriverError),

    #[error("Structural fault on {retailer}: nothing matched `{selector}`")]
    Structural { retailer: String, selector: String },

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Reconciliation input {path}: {message}")]
    ReconcileInput { path: String, message: String },

    #[error("Unknown retailer `{0}` (not present in configuration)")]
    UnknownRetailer(String),

    #[error("Retailer `{retailer}` has no `{operation}` operation configured")]
    UnknownOperation { retailer: String, operation: String },

    #[error("No [bundles] section in configuration")]
    BundlesNotConfigured,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for shelfdiff operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Bundle, BundleGame, CatalogEntry, RetailerSnapshot};
pub use config::Config;
pub use names::{normalize, normalize_strict, NameKey};
pub use scrape::{PaginationController, RunState, TerminationPolicy};
