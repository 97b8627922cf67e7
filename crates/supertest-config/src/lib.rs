//! Typed configuration for supertest.
//!
//! Test suites usually run against several environments (a developer
//! laptop, CI, a staging cluster), so transport and logging settings are
//! loaded in layers:
//! - Built-in defaults
//! - A TOML or JSON file
//! - Environment variable overrides
//!
//! # Example
//!
//! ```no_run
//! use supertest_config::ConfigLoader;
//!
//! # fn main() -> Result<(), supertest_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("supertest.toml")?
//!     .with_env_prefix("SUPERTEST")
//!     .load()?;
//!
//! println!("request timeout: {:?}", config.transport.timeout());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [transport]
//! timeout_ms = 5000
//! user_agent = "orders-service-tests/1.0"
//!
//! [transport.default_headers]
//! x-api-key = "local-dev-key"
//!
//! [logging]
//! enabled = true
//! level = "supertest=debug"
//! format = "pretty"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `SUPERTEST__TRANSPORT__TIMEOUT_MS=10000`
//! - `SUPERTEST__TRANSPORT__DEFAULT_HEADERS__X_API_KEY=secret` (sends `x-api-key: secret`)
//! - `SUPERTEST__LOGGING__FORMAT=json`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
