//! Configuration module for the AnimeWorld scraper
//!
//! Handles loading environment variables and application configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::constants::site;
use crate::scraper::ScraperConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Site root used to resolve relative links, without trailing slash
    pub base_url: String,
    /// Whole-request timeout enforced by the HTTP transport
    pub request_timeout_secs: u64,
    /// Connection timeout enforced by the HTTP transport
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: site::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional. Values that fail to parse fall back to
    /// their defaults with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            base_url: env::var("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            connect_timeout_secs: parse_var("CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
        }
    }

    /// Transport settings derived from this configuration
    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
