use serde::Deserialize;

/// Main configuration structure for Shopmap
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Maximum link depth to follow from a seed URL
    #[serde(rename = "max-depth", default = "defaults::max_depth")]
    pub max_depth: u32,

    /// Worker pool size shared across all sessions
    #[serde(rename = "max-concurrent-fetches", default = "defaults::max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,

    /// Delay before each fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "defaults::politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Backoff before retrying a rate-limited fetch (milliseconds)
    #[serde(rename = "retry-backoff-ms", default = "defaults::retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Retry budget per job; only HTTP 429 is ever retried
    #[serde(rename = "max-retries", default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Frontier cap per session; overflow links are dropped and counted
    #[serde(rename = "max-frontier", default = "defaults::max_frontier")]
    pub max_frontier: u32,

    /// Per-session deadline in seconds; 0 disables it
    #[serde(rename = "session-timeout-secs", default = "defaults::session_timeout_secs")]
    pub session_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "defaults::crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "defaults::crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default = "defaults::contact_url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default = "defaults::contact_email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path for the JSON report; empty means stdout only
    #[serde(rename = "report-path", default)]
    pub report_path: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::max_depth(),
            max_concurrent_fetches: defaults::max_concurrent_fetches(),
            politeness_delay_ms: defaults::politeness_delay_ms(),
            retry_backoff_ms: defaults::retry_backoff_ms(),
            max_retries: defaults::max_retries(),
            max_frontier: defaults::max_frontier(),
            session_timeout_secs: defaults::session_timeout_secs(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: defaults::crawler_name(),
            crawler_version: defaults::crawler_version(),
            contact_url: defaults::contact_url(),
            contact_email: defaults::contact_email(),
        }
    }
}

mod defaults {
    pub fn max_depth() -> u32 {
        2
    }

    pub fn max_concurrent_fetches() -> u32 {
        10
    }

    pub fn politeness_delay_ms() -> u64 {
        2000
    }

    pub fn retry_backoff_ms() -> u64 {
        5000
    }

    pub fn max_retries() -> u32 {
        1
    }

    pub fn max_frontier() -> u32 {
        10_000
    }

    pub fn session_timeout_secs() -> u64 {
        300
    }

    pub fn crawler_name() -> String {
        "Shopmap".to_string()
    }

    pub fn crawler_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    pub fn contact_url() -> String {
        "https://github.com/shopmap/shopmap".to_string()
    }

    pub fn contact_email() -> String {
        "crawler@shopmap.dev".to_string()
    }
}
