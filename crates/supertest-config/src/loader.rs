//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, SupertestConfig};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use supertest_config::ConfigLoader;
///
/// # fn main() -> Result<(), supertest_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("supertest.toml")?
///     .with_env_prefix("SUPERTEST")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: SupertestConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SupertestConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = SupertestConfig::default();
        self
    }

    /// Start with the local development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = SupertestConfig::development();
        self
    }

    /// Start with the CI preset.
    #[must_use]
    pub fn with_ci(mut self) -> Self {
        self.config = SupertestConfig::ci();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format ("toml" or "json").
    ///
    /// # Example
    ///
    /// ```
    /// use supertest_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [transport]
    ///     timeout_ms = 1500
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.transport.timeout_ms, Some(1500));
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// `SUPERTEST__TRANSPORT__TIMEOUT_MS=5000`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::validation_error(format!(
                "failed to load .env file: {e}"
            ))),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    pub fn load(mut self) -> Result<SupertestConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation or environment overrides.
    #[must_use]
    pub fn load_unvalidated(self) -> SupertestConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<SupertestConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let scoped = format!("{prefix}__");
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(&scoped))
            .collect();

        // Sorted so default headers set from the environment have a stable order.
        let mut keys: Vec<&String> = env_vars.keys().collect();
        keys.sort();

        for key in keys {
            self.apply_env_var(key, &env_vars[key], prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["TRANSPORT", "TIMEOUT_MS"] => {
                self.config.transport.timeout_ms = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        ConfigError::env_parse_error(key, "expected integer or 'none'")
                    })?)
                };
            }
            ["TRANSPORT", "USER_AGENT"] => {
                self.config.transport.user_agent = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            ["TRANSPORT", "DEFAULT_HEADERS", name] => {
                let name = name.to_lowercase().replace('_', "-");
                self.config
                    .transport
                    .default_headers
                    .insert(name, value.to_string());
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "TEST_WRITER"] => {
                self.config.logging.test_writer = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Unknown keys are ignored
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, SupertestConfig::default());
    }

    #[test]
    fn test_loader_presets() {
        let dev = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(dev.logging.level, "debug");

        let ci = ConfigLoader::new().with_ci().load().unwrap();
        assert_eq!(ci.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [transport]
            user_agent = "suite/2.0"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.transport.user_agent.as_deref(), Some("suite/2.0"));
        assert_eq!(config.transport.timeout_ms, Some(30_000));
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"logging": {"format": "json", "level": "info"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let result = ConfigLoader::new().with_string("a: b", "yaml");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[transport]\ntimeout_ms = 750").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.transport.timeout_ms, Some(750));
    }

    #[test]
    fn test_loader_with_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/supertest.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/supertest.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config, SupertestConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let result = ConfigLoader::new()
            .with_string("[transport]\ntimeout_ms = 0", "toml")
            .unwrap()
            .load();

        assert!(result.is_err());
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[transport]\ntimeout_ms = 0", "toml")
            .unwrap()
            .load_unvalidated();

        assert_eq!(config.transport.timeout_ms, Some(0));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Setting real environment variables would race with other tests, so the
    // override logic is exercised through apply_env_var directly.

    #[test]
    fn test_apply_env_var_timeout() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__TRANSPORT__TIMEOUT_MS", "1200", "TEST")
            .unwrap();
        assert_eq!(loader.config.transport.timeout_ms, Some(1200));

        loader
            .apply_env_var("TEST__TRANSPORT__TIMEOUT_MS", "none", "TEST")
            .unwrap();
        assert_eq!(loader.config.transport.timeout_ms, None);
    }

    #[test]
    fn test_apply_env_var_invalid_timeout() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__TRANSPORT__TIMEOUT_MS", "soon", "TEST");
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
    }

    #[test]
    fn test_apply_env_var_default_header() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__TRANSPORT__DEFAULT_HEADERS__X_API_KEY", "secret", "TEST")
            .unwrap();
        assert_eq!(
            loader.config.transport.default_headers.get("x-api-key"),
            Some(&"secret".to_string())
        );
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__LOGGING__FORMAT", "json", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__ENABLED", "off", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__LEVEL", "trace", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__TEST_WRITER", "yes", "TEST")
            .unwrap();
        assert!(loader.config.logging.test_writer);
        assert_eq!(loader.config.logging.format, LogFormat::Json);
        assert!(!loader.config.logging.enabled);
        assert_eq!(loader.config.logging.level, "trace");
    }

    #[test]
    fn test_apply_env_var_bad_format() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__TRANSPORT__RETRIES", "3", "TEST")
            .unwrap();
        assert_eq!(loader.config, SupertestConfig::default());
    }

    #[test]
    fn test_apply_env_var_missing_separator() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TESTTRANSPORT", "x", "TEST");
        assert!(result.is_err());
    }
}
