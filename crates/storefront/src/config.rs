//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` turns on secure cookies
//!   (default: <http://localhost:3000>)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog file (default: built-in bouquets)
//! - `CHECKOUT_PROCESSING_DELAY_MS` - Simulated order processing latency (default: 1500)
//! - `STOREFRONT_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROCESSING_DELAY_MS: u64 = 1500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How log lines are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected text or json")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog file to load instead of the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Latency of the simulated order processor
    pub processing_delay: Duration,
    /// Log line format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            catalog_path: None,
            processing_delay: Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = parse_env_or("STOREFRONT_HOST", defaults.host)?;
        let port = parse_env_or("STOREFRONT_PORT", defaults.port)?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", &defaults.base_url);
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let processing_delay = Duration::from_millis(parse_env_or(
            "CHECKOUT_PROCESSING_DELAY_MS",
            DEFAULT_PROCESSING_DELAY_MS,
        )?);
        let log_format = parse_env_or("STOREFRONT_LOG_FORMAT", defaults.log_format)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            defaults.sentry_traces_sample_rate,
        )?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            processing_delay,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_env_or(key, default)?;
    check_rate(key, rate)
}

fn check_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ))
    }
}
