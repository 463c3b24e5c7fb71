//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then `CEDEARPRO_*` environment
//! variables, then command-line overrides. `validate()` runs last.

use crate::constants::{
    DEFAULT_CACHE_BUST_PARAM, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_USER_AGENT, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Settings for fetching and refreshing the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Published CSV export URL of the sheet
    pub sheet_url: String,

    /// Seconds between scheduled refreshes
    pub refresh_interval_secs: u64,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Query parameter carrying the cache-busting timestamp
    pub cache_bust_param: String,

    /// User agent sent with each request
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_url: String::new(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_bust_param: DEFAULT_CACHE_BUST_PARAM.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Overlay values from an environment-like lookup
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(env_vars::SHEET_URL) {
            debug!("Sheet URL taken from {}", env_vars::SHEET_URL);
            self.sheet_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(env_vars::REFRESH_SECS) {
            self.refresh_interval_secs = parse_env_u64(env_vars::REFRESH_SECS, &raw)?;
        }

        if let Some(raw) = lookup(env_vars::TIMEOUT_MS) {
            self.request_timeout_ms = parse_env_u64(env_vars::TIMEOUT_MS, &raw)?;
        }

        Ok(self)
    }

    /// Set the sheet URL
    pub fn with_sheet_url(mut self, url: impl Into<String>) -> Self {
        self.sheet_url = url.into();
        self
    }

    /// Set the refresh interval in seconds
    pub fn with_refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// Set the request timeout in milliseconds
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.validate_url()?;
        self.validate_timing()
    }

    /// Check the sheet URL only
    pub fn validate_url(&self) -> Result<()> {
        let url = self.sheet_url.trim();
        if url.is_empty() {
            return Err(Error::configuration(format!(
                "No sheet URL configured (set {} or pass --url)",
                env_vars::SHEET_URL
            )));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::configuration(format!(
                "Sheet URL must use http or https: '{}'",
                url
            )));
        }

        Ok(())
    }

    /// Check everything except the URL (file-backed runs have none)
    pub fn validate_timing(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(Error::configuration(
                "Refresh interval must be greater than 0",
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(Error::configuration("Request timeout must be greater than 0"));
        }

        if self.cache_bust_param.trim().is_empty() {
            return Err(Error::configuration(
                "Cache-busting parameter name cannot be empty",
            ));
        }

        Ok(())
    }
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::configuration(format!("{} must be a whole number, got '{}'", name, raw))
    })
}
