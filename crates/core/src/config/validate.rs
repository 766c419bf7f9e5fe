use super::{types::Config, ConfigError};

/// Validate a loaded configuration before wiring anything up.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.base_url must be set".to_string(),
        ));
    }
    if reqwest::Url::parse(&config.catalog.base_url).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "catalog.base_url is not a valid URL: {}",
            config.catalog.base_url
        )));
    }
    if config.catalog.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_key must be set".to_string(),
        ));
    }
    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.bot.command_prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "bot.command_prefix must not be empty".to_string(),
        ));
    }
    if config.search.backoff_cap_ms < config.search.backoff_base_ms {
        return Err(ConfigError::ValidationError(
            "search.backoff_cap_ms must be >= search.backoff_base_ms".to_string(),
        ));
    }
    if config.search.max_rejections == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_rejections must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
