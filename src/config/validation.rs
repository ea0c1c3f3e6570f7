use crate::config::types::{
    BundlesConfig, Config, OutputConfig, ReconcileConfig, RetailerConfig, ScraperConfig,
};
use crate::scrape::{ItemShape, TerminationKind};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_reconcile_config(&config.reconcile)?;
    validate_retailers(&config.retailer)?;
    if let Some(bundles) = &config.bundles {
        validate_bundles_config(bundles)?;
    }
    Ok(())
}

/// Validates shared scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver_url: {}", e)))?;

    if config.settle_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "settle_delay_ms must be >= 100ms, got {}ms",
            config.settle_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_dir.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_dir cannot be empty".to_string(),
        ));
    }

    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    if config.bundles_path.is_empty() {
        return Err(ConfigError::Validation(
            "bundles_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates reconciliation inputs
fn validate_reconcile_config(config: &ReconcileConfig) -> Result<(), ConfigError> {
    if config.reference_path.is_empty() {
        return Err(ConfigError::Validation(
            "reference_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retailer entries
fn validate_retailers(retailers: &[RetailerConfig]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for retailer in retailers {
        if retailer.name.is_empty() {
            return Err(ConfigError::Validation(
                "retailer name cannot be empty".to_string(),
            ));
        }

        if !retailer
            .name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "retailer name must contain only alphanumeric characters, hyphens, and underscores, got '{}'",
                retailer.name
            )));
        }

        if !names.insert(retailer.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer name '{}'",
                retailer.name
            )));
        }

        if retailer.operations.is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' must configure at least one operation",
                retailer.name
            )));
        }

        for (operation, url) in &retailer.operations {
            Url::parse(url).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid URL for {}.{}: {}",
                    retailer.name, operation, e
                ))
            })?;
        }

        // The explicit-disabled policy compares against a sentinel href, so
        // the sentinel must be configured
        if retailer.termination == TerminationKind::ExplicitDisabled
            && retailer
                .disabled_next_href
                .as_deref()
                .unwrap_or("")
                .is_empty()
        {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' uses explicit-disabled termination but sets no disabled-next-href",
                retailer.name
            )));
        }

        if retailer.shape == ItemShape::Simple && retailer.selectors.original_price.is_none() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' uses the simple shape but configures no original-price selector",
                retailer.name
            )));
        }
    }

    Ok(())
}

/// Validates the bundle gallery section
fn validate_bundles_config(config: &BundlesConfig) -> Result<(), ConfigError> {
    Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid bundles url: {}", e)))?;

    for (field, value) in [
        ("link-selector", &config.link_selector),
        ("title-selector", &config.title_selector),
        ("ends-selector", &config.ends_selector),
        ("price-selector", &config.price_selector),
        ("active-name", &config.active_name),
        ("active-developer", &config.active_developer),
        ("next-control", &config.next_control),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!(
                "bundles {} cannot be empty",
                field
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SelectorConfig;
    use std::collections::BTreeMap;

    fn retailer(name: &str) -> RetailerConfig {
        RetailerConfig {
            name: name.to_string(),
            shape: ItemShape::Flat,
            termination: TerminationKind::Probe,
            disabled_next_href: None,
            discount_prefix: String::new(),
            selectors: SelectorConfig {
                item: ".item".to_string(),
                name: "h3".to_string(),
                price: Some(".price".to_string()),
                discount: None,
                original_price: None,
                savings: None,
                next: ".next".to_string(),
            },
            operations: BTreeMap::from([(
                "full".to_string(),
                "https://shop.example/all".to_string(),
            )]),
        }
    }

    #[test]
    fn test_duplicate_retailer_names_rejected() {
        let result = validate_retailers(&[retailer("shop"), retailer("shop")]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_explicit_disabled_requires_sentinel() {
        let mut bad = retailer("shop");
        bad.termination = TerminationKind::ExplicitDisabled;
        assert!(validate_retailers(&[bad.clone()]).is_err());

        bad.disabled_next_href = Some("javascript:void(0);".to_string());
        assert!(validate_retailers(&[bad]).is_ok());
    }

    #[test]
    fn test_simple_shape_requires_original_price_selector() {
        let mut bad = retailer("shop");
        bad.shape = ItemShape::Simple;
        assert!(validate_retailers(&[bad.clone()]).is_err());

        bad.selectors.original_price = Some("strike".to_string());
        assert!(validate_retailers(&[bad]).is_ok());
    }

    #[test]
    fn test_operation_urls_must_parse() {
        let mut bad = retailer("shop");
        bad.operations
            .insert("sale".to_string(), "not a url".to_string());
        assert!(matches!(
            validate_retailers(&[bad]),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
