use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};
use crate::storage::FORBIDDEN_CHARS;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    if let Some(catalog_url) = &config.catalog_url {
        validate_http_url("catalog-url", catalog_url)?;
    }

    if config.cookie_name.is_empty() {
        return Err(ConfigError::Validation(
            "cookie-name cannot be empty".to_string(),
        ));
    }

    if !config
        .cookie_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "cookie-name must contain only ASCII alphanumerics, '_' and '-', got '{}'",
            config.cookie_name
        )));
    }

    if let Some(session_id) = &config.session_id {
        validate_session_id(session_id)?;
    }

    Ok(())
}

/// Validates a session token so it can be sent verbatim in a Cookie header
pub fn validate_session_id(session_id: &str) -> Result<(), ConfigError> {
    if session_id.is_empty() {
        return Err(ConfigError::Validation(
            "session-id cannot be empty".to_string(),
        ));
    }

    if session_id
        .chars()
        .any(|c| !c.is_ascii_graphic() || c == ';' || c == ',' || c == '"')
    {
        return Err(ConfigError::Validation(
            "session-id contains characters not allowed in a cookie value".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "root-dir cannot be empty".to_string(),
        ));
    }

    let images_dir = config.images_dir.trim();
    if images_dir.is_empty() || images_dir == "." || images_dir == ".." {
        return Err(ConfigError::Validation(format!(
            "images-dir must name a directory, got '{}'",
            config.images_dir
        )));
    }

    if images_dir.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) {
        return Err(ConfigError::Validation(format!(
            "images-dir must be a single path component, got '{}'",
            config.images_dir
        )));
    }

    if let Some(log_file) = &config.log_file {
        if log_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log-file cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("section-link", &config.section_link),
        ("section-block", &config.section_block),
        ("category-link", &config.category_link),
        ("article-link", &config.article_link),
        ("load-more", &config.load_more),
        ("offset-field", &config.offset_field),
        ("breadcrumb", &config.breadcrumb),
        ("title", &config.title),
        ("content", &config.content),
    ];

    for (name, selector) in selectors {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} = '{}': {}", name, selector, e))
        })?;
    }

    Ok(())
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(())
}
