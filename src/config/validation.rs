use crate::config::types::{
    ApiConfig, Config, OutputConfig, PaginationConfig, SelectorConfig, SourceConfig,
    TimeoutConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_selector_config(&config.selectors)?;
    validate_pagination_config(&config.pagination)?;
    validate_timeout_config(&config.timeouts)?;
    validate_output_config(&config.output)?;
    validate_api_config(&config.api)?;
    Ok(())
}

fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.search_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "search_url '{}' must use http or https",
            config.search_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("search_form", &config.search_form),
        ("search_button", &config.search_button),
        ("tender_row", &config.tender_row),
        ("number", &config.number),
        ("link", &config.link),
        ("end_date", &config.end_date),
        ("next_page", &config.next_page),
    ];

    for (name, selector) in selectors {
        validate_css_selector(name, selector)?;
    }

    Ok(())
}

/// Checks that a selector is non-empty and parses as CSS
fn validate_css_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} cannot be empty",
            name
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} '{}': {}", name, selector, e))
    })?;

    Ok(())
}

fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.default_max_records < 1 {
        return Err(ConfigError::Validation(format!(
            "default_max_records must be >= 1, got {}",
            config.default_max_records
        )));
    }

    Ok(())
}

fn validate_timeout_config(config: &TimeoutConfig) -> Result<(), ConfigError> {
    let bounded = [
        ("search_form", config.search_form),
        ("tender_rows", config.tender_rows),
        ("next_page", config.next_page),
        ("request", config.request),
    ];

    for (name, millis) in bounded {
        if millis == 0 {
            return Err(ConfigError::Validation(format!(
                "timeouts.{} must be > 0ms",
                name
            )));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid api bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}
