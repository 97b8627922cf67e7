//! Errors raised while loading a test-run configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Why a `supertest` configuration could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path that was opened.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A `.toml` file or string is malformed or has unknown keys.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A `.json` file or string is malformed or has unknown keys.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A setting parsed but cannot be used, e.g. a zero timeout or an
    /// invalid default header.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted setting path, e.g. `transport.timeout_ms`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `PREFIX__SECTION__KEY` override could not be parsed.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// Full variable name.
        var: String,
        /// Expected shape of the value.
        reason: String,
    },

    /// The loader was used incorrectly, e.g. with an unsupported format.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Missing file at `path`.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Unreadable file at `path`.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Rejected setting at dotted path `field`.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Unparseable override in environment variable `var`.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Loader misuse described by `message`.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Returns the setting or variable the error is about, when there is one.
    pub fn setting(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { field, .. } => Some(field.as_str()),
            Self::EnvParseError { var, .. } => Some(var.as_str()),
            _ => None,
        }
    }
}
