//! Shopmap: a polite product-page discovery crawler
//!
//! This crate crawls seed domains by following same-domain hyperlinks to a
//! bounded depth, respecting robots.txt and rate limits, and collects every
//! URL whose path classifies as a product page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Shopmap operations
#[derive(Debug, Error)]
pub enum ShopmapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Shopmap operations
pub type Result<T> = std::result::Result<T, ShopmapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, FetchOutcome, PageFetcher};
pub use robots::RobotsCache;
pub use url::{host_of, is_product_url, normalize_host, same_domain};
