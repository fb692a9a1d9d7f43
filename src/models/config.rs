//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and retry behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Catalog site endpoints and page selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// Output destination settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.retry.max_attempts == 0 {
            return Err(AppError::validation("crawler.retry.max_attempts must be > 0"));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Politeness delay between remote requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent detail-page fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Retry policy for individual fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Whether candidate links are scoped per keyword or accumulated
    #[serde(default)]
    pub link_scope: LinkScope,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            retry: RetryConfig::default(),
            link_scope: LinkScope::default(),
        }
    }
}

/// Bounded retry settings for a single fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per URL, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[serde(default = "defaults::base_delay")]
    pub base_delay_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            base_delay_ms: defaults::base_delay(),
            max_delay_ms: defaults::max_delay(),
        }
    }
}

/// Scope of the candidate-link list driving detail fetches.
///
/// `PerKeyword` fetches only the links found by the current keyword's
/// search. `Accumulate` keeps earlier keywords' links in the list, so
/// each flush re-fetches every link seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LinkScope {
    #[default]
    PerKeyword,
    Accumulate,
}

/// Catalog site endpoints and the CSS selectors locating search results.
///
/// The selectors track the current page layout and are expected to churn;
/// that is why they live in config rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin against which relative links are resolved
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Search endpoint path, receives the keyword as `?q=`
    #[serde(default = "defaults::search_path")]
    pub search_path: String,

    /// Selector for the search-results container
    #[serde(default = "defaults::results_container")]
    pub results_container: String,

    /// Selector for the result list within the container
    #[serde(default = "defaults::results_list")]
    pub results_list: String,

    /// Selector for one result item within the list
    #[serde(default = "defaults::results_item")]
    pub results_item: String,

    /// Selector for the detail-page link within one item
    #[serde(default = "defaults::results_link")]
    pub results_link: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            search_path: defaults::search_path(),
            results_container: defaults::results_container(),
            results_list: defaults::results_list(),
            results_item: defaults::results_item(),
            results_link: defaults::results_link(),
        }
    }
}

/// Output destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the append-only CSV file
    #[serde(default = "defaults::csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: defaults::csv_path(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
            .to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        2000
    }

    pub fn max_concurrent() -> usize {
        4
    }

    pub fn max_attempts() -> u32 {
        31
    }

    pub fn base_delay() -> u64 {
        1000
    }

    pub fn max_delay() -> u64 {
        3000
    }

    pub fn base_url() -> String {
        "https://www.imdb.com".to_string()
    }

    pub fn search_path() -> String {
        "/find/".to_string()
    }

    pub fn results_container() -> String {
        "div.sc-e8e4ce7-2.gdpdyr".to_string()
    }

    pub fn results_list() -> String {
        "ul".to_string()
    }

    pub fn results_item() -> String {
        "li".to_string()
    }

    pub fn results_link() -> String {
        "a".to_string()
    }

    pub fn csv_path() -> String {
        "imdb_data.csv".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.crawler.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = Config::default();
        config.site.base_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_link_scope_parses_kebab_case() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            link_scope = "accumulate"
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.link_scope, LinkScope::Accumulate);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [output]
            csv_path = "out.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.csv_path, "out.csv");
        assert_eq!(config.crawler.retry.max_attempts, 31);
        assert_eq!(config.site.base_url, "https://www.imdb.com");
    }
}
