use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.max_frontier < 1 {
        return Err(ConfigError::Validation(format!(
            "max_frontier must be >= 1, got {}",
            config.max_frontier
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email shape check: one `@` with something on both sides and a dot
/// in the domain part
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "contact_email must contain '@', got '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "contact_email is malformed: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent_fetches = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent_fetches = 500;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_retries_rejected() {
        let mut config = Config::default();
        config.crawler.max_retries = 50;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_frontier_rejected() {
        let mut config = Config::default();
        config.crawler.max_frontier = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_crawler_name_rejected() {
        let mut config = Config::default();
        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_with_spaces_rejected() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "My Crawler".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_contact_url_rejected() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("admin@").is_err());
        assert!(validate_email("admin@nodot").is_err());
    }
}
