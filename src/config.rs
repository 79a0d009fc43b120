//! Environment-driven configuration

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://api.nameslol.com";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the summoner lookup service, without a trailing slash.
    pub lookup_base_url: String,
    pub lookup_timeout: Duration,
    pub port: u16,
    /// Ads run in demo mode everywhere except production.
    pub production: bool,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// ## Environment Variables
    ///
    /// - `NAMESLOL_API_URL`: lookup service base URL (default `https://api.nameslol.com`)
    /// - `PORT`: listen port (default `3000`)
    /// - `APP_ENVIRONMENT`: `production` disables demo ads
    /// - `LOOKUP_TIMEOUT_SECS`: outbound request timeout (default `10`)
    pub fn from_env() -> Result<Self> {
        let lookup_base_url = std::env::var("NAMESLOL_API_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOOKUP_BASE_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port > 0)
                .with_context(|| format!("PORT must be a port number, got `{value}`"))?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        let lookup_timeout = std::env::var("LOOKUP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map_or_else(
                || Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
                Duration::from_secs,
            );

        let production = std::env::var("APP_ENVIRONMENT")
            .map(|value| value.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            lookup_base_url,
            lookup_timeout,
            port,
            production,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            port: DEFAULT_SERVER_PORT,
            production: false,
        }
    }
}
