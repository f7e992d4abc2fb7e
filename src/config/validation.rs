use log::warn;

use crate::config::Config;
use crate::dom::Selector;
use crate::utils::error::{BoxResult, PagetocError};

/// Validate the configuration
pub fn validate_config(config: &Config) -> BoxResult<()> {
    validate_selectors(config)?;
    validate_toc(config)?;
    validate_highlight(config)?;
    validate_names(config)?;
    validate_retry(config);
    Ok(())
}

/// Every configured selector must compile
fn validate_selectors(config: &Config) -> BoxResult<()> {
    let selectors = &config.selectors;
    for (key, value) in [
        ("selectors.content", &selectors.content),
        ("selectors.main", &selectors.main),
        ("selectors.sidebar", &selectors.sidebar),
        ("selectors.nav_wrapper", &selectors.nav_wrapper),
    ] {
        Selector::parse(value).map_err(|e| {
            PagetocError::Config(format!("{} is not a valid selector ({}): {}", key, value, e))
        })?;
    }
    Ok(())
}

fn validate_toc(config: &Config) -> BoxResult<()> {
    if !(1..=6).contains(&config.toc.max_level) {
        return Err(PagetocError::Config(format!(
            "toc.max_level must be between 1 and 6, got {}", config.toc.max_level
        )).into());
    }
    Ok(())
}

fn validate_highlight(config: &Config) -> BoxResult<()> {
    let highlight = &config.highlight;
    if !highlight.look_ahead.is_finite() {
        return Err(PagetocError::Config("highlight.look_ahead must be a finite number".to_string()).into());
    }
    if !highlight.bottom_threshold.is_finite() || highlight.bottom_threshold < 0.0 {
        return Err(PagetocError::Config(
            "highlight.bottom_threshold must be a non-negative number".to_string(),
        ).into());
    }
    Ok(())
}

/// Class names, ids and attribute names end up in markup and must be single tokens
fn validate_names(config: &Config) -> BoxResult<()> {
    for (key, value) in [
        ("toc.container_class", &config.toc.container_class),
        ("toc.nav_id", &config.toc.nav_id),
        ("highlight.active_class", &config.highlight.active_class),
        ("navigation.label_class", &config.navigation.label_class),
        ("navigation.enhanced_attribute", &config.navigation.enhanced_attribute),
        ("navigation.next_class", &config.navigation.next_class),
    ] {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(PagetocError::Config(format!(
                "{} must be a non-empty name without whitespace, got '{}'", key, value
            )).into());
        }
    }
    Ok(())
}

fn validate_retry(config: &Config) {
    if config.retry.delays_ms.is_empty() {
        warn!("retry.delays_ms is empty; navigation labels will never be injected");
    }
}
