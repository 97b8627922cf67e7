//! Main configuration types.
//!
//! This module provides the top-level [`SupertestConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, TransportConfig};

/// Complete supertest configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use supertest_config::SupertestConfig;
///
/// let config = SupertestConfig::default();
/// assert_eq!(config.transport.timeout_ms, Some(30_000));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SupertestConfig {
    /// Transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SupertestConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> SupertestConfigBuilder {
        SupertestConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The timeout is zero
    /// - A default header name or value is not valid HTTP
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.timeout_ms == Some(0) {
            return Err(ConfigError::invalid_value(
                "transport.timeout_ms",
                "must be greater than zero",
            ));
        }

        for (name, value) in self.transport.header_pairs() {
            if http::HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::invalid_value(
                    "transport.default_headers",
                    format!("invalid header name: {name:?}"),
                ));
            }
            if http::HeaderValue::from_str(&value).is_err() {
                return Err(ConfigError::invalid_value(
                    "transport.default_headers",
                    format!("invalid value for header {name:?}"),
                ));
            }
        }

        if self.logging.enabled {
            supertest_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a preset for local runs.
    ///
    /// - Pretty log output at debug level with source locations, captured
    ///   per test
    /// - No request deadline, so a debugger can pause the server
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config.logging.test_writer = true;

        config.transport.timeout_ms = None;

        config
    }

    /// Create a preset for CI runs.
    ///
    /// - JSON log output at info level
    /// - A 10 second request deadline
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;

        config.transport.timeout_ms = Some(10_000);

        config
    }
}

/// Builder for [`SupertestConfig`].
#[derive(Debug, Default)]
pub struct SupertestConfigBuilder {
    transport: Option<TransportConfig>,
    logging: Option<LoggingConfig>,
}

impl SupertestConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport configuration.
    #[must_use]
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> SupertestConfig {
        SupertestConfig {
            transport: self.transport.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<SupertestConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
