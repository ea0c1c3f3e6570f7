//! Configuration module for shelfdiff
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning retailer sections into runnable listing plans.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BundlesConfig, Config, OutputConfig, ReconcileConfig, RetailerConfig, ScraperConfig,
    SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
