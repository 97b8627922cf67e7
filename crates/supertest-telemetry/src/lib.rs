//! Structured logging for supertest.
//!
//! Requests fired by `supertest` emit `tracing` events. This crate wires
//! those events to an output: JSON lines for CI logs, or a pretty
//! human-readable format while iterating locally.
//!
//! # Example
//!
//! ```rust,ignore
//! use supertest_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(http.method = "GET", http.url = "http://127.0.0.1:8080/", "firing request");
//! ```
//!
//! Inside `#[test]` functions prefer [`init_test_logging`], which routes output
//! through the libtest capture writer and can be called from every test.

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
