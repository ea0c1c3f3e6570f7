use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to tell whether snapshots from different runs were captured
/// under the same selector tables.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{ItemShape, TerminationKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r##"
[scraper]
webdriver-url = "http://localhost:4444"
settle-delay-ms = 1000
settle-jitter-ms = 500

[output]
snapshot-dir = "./snapshots"
report-path = "./report.json"
bundles-path = "./bundles.json"

[reconcile]
reference-path = "./reference.json"

[[retailer]]
name = "billetshop"
shape = "flat"
termination = "explicit-disabled"
disabled-next-href = "javascript:void(0);"
discount-prefix = "Sale"

[retailer.selectors]
item = ".product-items .grid-item"
name = "h3 a"
price = ".buy span"
discount = ".buy a"
next = ".pagination .next a"

[retailer.operations]
full = "https://billetshop.example/catalog"
sale = "https://billetshop.example/catalog?discount=1"

[[retailer]]
name = "planetshop"
shape = "simple"
termination = "probe"

[retailer.selectors]
item = ".shop-listing .row"
name = "h4 a"
price = ".price_current"
original-price = ".price_base strike"
savings = ".price_saving"
next = "a[rel=next]"

[retailer.operations]
full = "https://planetshop.example/all"

[bundles]
url = "https://bundleshop.example/bundles"
link-selector = ".fit-click"
title-selector = ".caption h3"
ends-selector = ".ends span"
price-selector = ".bundle-price"
carousel-container = "#carousel"
active-name = ".active h3"
active-developer = ".active .dev a"
next-control = ".carousel-next"
"##;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.settle_delay_ms, 1000);
        assert_eq!(config.retailer.len(), 2);
        assert_eq!(config.retailer[0].shape, ItemShape::Flat);
        assert_eq!(
            config.retailer[0].termination,
            TerminationKind::ExplicitDisabled
        );
        assert_eq!(config.retailer[1].shape, ItemShape::Simple);
        assert_eq!(config.retailer[0].operations.len(), 2);
        assert!(config.bundles.is_some());
    }

    #[test]
    fn test_listing_plan_from_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        let plan = config
            .retailer("billetshop")
            .unwrap()
            .listing_plan("sale", config.settle_delay())
            .unwrap();
        assert_eq!(plan.start_url, "https://billetshop.example/catalog?discount=1");
        assert_eq!(plan.discount_prefix, "Sale");

        let missing = config
            .retailer("planetshop")
            .unwrap()
            .listing_plan("sale", config.settle_delay());
        assert!(matches!(
            missing,
            Err(crate::SyncError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_unknown_retailer_lookup() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();
        assert!(matches!(
            config.retailer("nowhere"),
            Err(crate::SyncError::UnknownRetailer(_))
        ));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(&VALID_CONFIG.replace(
            "settle-delay-ms = 1000",
            "settle-delay-ms = 10",
        ));
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        assert_ne!(
            compute_config_hash(file1.path()).unwrap(),
            compute_config_hash(file2.path()).unwrap()
        );
    }
}
