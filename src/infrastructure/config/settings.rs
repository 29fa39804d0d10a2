//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from an optional TOML file, then overridden from the
//! environment. Secrets (`API_TOKEN`, `WEBHOOK_SECRET`) are only ever read from
//! the environment.
//!
//! # Example
//!
//! ```no_run
//! use tradewatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::dedup::{DedupBackend, DedupConfig};
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::source::SourceConfig;
use super::webhook::WebhookConfig;
use crate::application::MonitorSettings;
use crate::error::{ConfigError, Result};

/// Upper bound for `source.max_concurrent_pages`.
pub const MAX_CONCURRENT_PAGES_LIMIT: usize = 20;
/// Upper bound for `webhook.max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// `[monitor]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Milliseconds between scan starts.
    pub interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { interval_ms: 5_000 }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub webhook: WebhookConfig,
    pub monitor: MonitorConfig,
    pub dedup: DedupConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse TOML content, apply process environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override does not parse,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`parse_toml`](Self::parse_toml) with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// See [`parse_toml`](Self::parse_toml).
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when it exists, otherwise from defaults plus the
    /// environment alone.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid, or if
    /// the resulting configuration fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Apply environment overrides.
    #[allow(clippy::result_large_err)]
    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        self.source.token = var("API_TOKEN");
        self.webhook.secret = var("WEBHOOK_SECRET");

        if let Some(url) = var("API_BASE_URL") {
            self.source.base_url = url;
        }
        if let Some(url) = var("WEBHOOK_URL") {
            self.webhook.url = Some(url);
        }
        if let Some(v) = var("MONITOR_INTERVAL") {
            self.monitor.interval_ms = parse_env("MONITOR_INTERVAL", &v)?;
        }
        if let Some(v) = var("PAGE_SIZE") {
            self.source.page_size = parse_env("PAGE_SIZE", &v)?;
        }
        if let Some(v) = var("API_TIMEOUT") {
            self.source.timeout_ms = parse_env("API_TIMEOUT", &v)?;
        }
        if let Some(v) = var("MAX_RETRIES") {
            self.webhook.max_attempts = parse_env("MAX_RETRIES", &v)?;
        }
        if let Some(v) = var("WEBHOOK_TIMEOUT") {
            self.webhook.timeout_ms = parse_env("WEBHOOK_TIMEOUT", &v)?;
        }
        if let Some(v) = var("HEALTH_CHECK_PORT") {
            self.server.set_port(parse_env("HEALTH_CHECK_PORT", &v)?);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.base_url",
            }
            .into());
        }
        Url::parse(&self.source.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "source.base_url",
            reason: e.to_string(),
        })?;
        if let Some(url) = &self.webhook.url {
            Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "webhook.url",
                reason: e.to_string(),
            })?;
        }
        if self.source.page_size == 0 {
            return Err(invalid("source.page_size", "must be greater than 0"));
        }
        if !(1..=MAX_CONCURRENT_PAGES_LIMIT).contains(&self.source.max_concurrent_pages) {
            return Err(invalid(
                "source.max_concurrent_pages",
                format!("must be between 1 and {MAX_CONCURRENT_PAGES_LIMIT}"),
            ));
        }
        if self.monitor.interval_ms == 0 {
            return Err(invalid("monitor.interval_ms", "must be greater than 0"));
        }
        if !(1..=MAX_ATTEMPTS_LIMIT).contains(&self.webhook.max_attempts) {
            return Err(invalid(
                "webhook.max_attempts",
                format!("must be between 1 and {MAX_ATTEMPTS_LIMIT}"),
            ));
        }
        if self.dedup.max_entries == 0 {
            return Err(invalid("dedup.max_entries", "must be greater than 0"));
        }
        if self.dedup.backend != DedupBackend::Memory && self.dedup.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "dedup.path",
            }
            .into());
        }
        if self.dedup.flush_interval_secs == 0 {
            return Err(invalid("dedup.flush_interval_secs", "must be greater than 0"));
        }
        if self.server.enabled && self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(invalid("server.bind", "must be a socket address"));
        }
        Ok(())
    }

    /// Scheduling parameters for the monitor.
    #[must_use]
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            interval: Duration::from_millis(self.monitor.interval_ms),
            max_attempts: self.webhook.max_attempts,
            max_concurrent_pages: self.source.max_concurrent_pages,
            flush_interval: Duration::from_secs(self.dedup.flush_interval_secs),
        }
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn parse_env<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(field, e.to_string()))
}
