//! Runtime configuration from the environment.
//!
//! The API endpoint is deliberately not hard-coded: it comes from
//! `USERDECK_API_URL`, with `.env` files honoured via dotenvy. Request
//! timeout is tunable through `USERDECK_TIMEOUT_SECS`.

use std::env;
use std::time::Duration;

/// Endpoint used when `USERDECK_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/usuarios";

/// Request timeout used when `USERDECK_TIMEOUT_SECS` is unset or invalid.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved runtime settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the user collection, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Reads settings from the process environment, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var("USERDECK_API_URL").ok(),
            env::var("USERDECK_TIMEOUT_SECS").ok(),
        )
    }

    fn resolve(base_url: Option<String>, timeout_secs: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = timeout_secs
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }
}
