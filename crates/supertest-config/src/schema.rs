//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Transport configuration section.
///
/// Controls how the HTTP transport issues requests: the per-request
/// deadline and headers attached to every request.
///
/// # Example
///
/// ```
/// use supertest_config::TransportConfig;
///
/// let config = TransportConfig {
///     timeout_ms: Some(5_000),
///     user_agent: Some("orders-tests".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Request deadline in milliseconds. None waits indefinitely.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,

    /// Headers sent with every request, before the request's own headers.
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,

    /// Value for the `User-Agent` header, if any.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            default_headers: IndexMap::new(),
            user_agent: None,
        }
    }
}

impl TransportConfig {
    /// Returns the request deadline as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Returns every header the transport attaches, in sending order.
    ///
    /// The user agent, when set, comes first.
    #[must_use]
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.default_headers.len() + 1);
        if let Some(agent) = &self.user_agent {
            pairs.push(("user-agent".to_string(), agent.clone()));
        }
        pairs.extend(
            self.default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        pairs
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_timeout_ms() -> Option<u64> {
    Some(30_000)
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (CI).
    Json,
    /// Human-readable pretty format (local runs).
    #[default]
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Write through the libtest capture writer, so output is shown only
    /// for failing tests.
    #[serde(default)]
    pub test_writer: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            test_writer: false,
        }
    }
}

impl From<&LoggingConfig> for supertest_telemetry::LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            file_line_info: config.include_location,
            test_writer: config.test_writer,
            ..Self::default()
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}
