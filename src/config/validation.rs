use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, RetryConfig};
use crate::ConfigError;

const MAX_VIEWPORT_DIMENSION: u32 = 16384;

/// Validates the entire configuration
///
/// Called by `load_config`, and again by the binary after command-line
/// overrides have been applied.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates traversal configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    for (name, value) in [
        ("viewport_width", config.viewport_width),
        ("viewport_height", config.viewport_height),
    ] {
        if !(1..=MAX_VIEWPORT_DIMENSION).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_VIEWPORT_DIMENSION, value
            )));
        }
    }

    if !config.sitemap_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "sitemap_path must start with '/', got '{}'",
            config.sitemap_path
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if !(1..=10).contains(&config.max_attempts) {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.page_load_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page_load_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    for cookie in &config.cookies {
        validate_cookie(cookie)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_dir.is_empty() {
        return Err(ConfigError::Validation(
            "base_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// A cookie must look like `name=value` with a non-empty name
fn validate_cookie(cookie: &str) -> Result<(), ConfigError> {
    match cookie.split_once('=') {
        Some((name, _)) if !name.trim().is_empty() && !name.contains(';') => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "cookie must have the form 'name=value', got '{}'",
            cookie
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_cookie() {
        assert!(validate_cookie("privacy-policy=1,XXXX").is_ok());
        assert!(validate_cookie("empty=").is_ok());

        assert!(validate_cookie("").is_err());
        assert!(validate_cookie("novalue").is_err());
        assert!(validate_cookie("=value").is_err());
        assert!(validate_cookie("a;b=c").is_err());
    }

    #[test]
    fn test_viewport_bounds() {
        let mut config = Config::default();
        config.crawler.viewport_width = 0;
        assert!(validate(&config).is_err());

        config.crawler.viewport_width = MAX_VIEWPORT_DIMENSION + 1;
        assert!(validate(&config).is_err());

        config.crawler.viewport_width = 375;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_sitemap_path_must_be_rooted() {
        let mut config = Config::default();
        config.crawler.sitemap_path = "sitemap.xml".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_retry_attempt_bounds() {
        let mut config = Config::default();
        config.retry.max_attempts = 11;
        assert!(validate(&config).is_err());

        config.retry.max_attempts = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }
}
