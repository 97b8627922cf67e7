//! # Supertest
//!
//! Fluent HTTP assertions for integration tests. A test builds one request
//! as a chain of calls, fires it, and gets back either `Ok(())` or the first
//! thing that went wrong.
//!
//! ## Key Features
//!
//! - **Fluent builder**: method, path, headers, query parameters and body
//! - **Typed expectations**: the expected body's type picks exact text,
//!   JSON tree, or typed comparison
//! - **Pluggable transports**: real HTTP/1.1 via hyper, in-memory handlers,
//!   or any closure
//! - **Completion callbacks**: observe the outcome exactly once
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use supertest::Request;
//!
//! Request::new("http://127.0.0.1:8080")
//!     .post("/users")
//!     .send(json!({"name": "Alice"}))
//!     .expect_body(201, json!({"id": 1, "name": "Alice"}))
//!     .unwrap();
//! ```
//!
//! ## Failure Order
//!
//! Exactly one [`ExpectError`] is reported, checked in this order:
//!
//! | Stage          | Error |
//! |----------------|-------|
//! | Body encoding  | [`ExpectError::Serialization`] (nothing is sent) |
//! | Transport      | [`ExpectError::Transport`] |
//! | Status         | [`ExpectError::StatusMismatch`] |
//! | Body decoding  | [`ExpectError::BodyDecode`] |
//! | Body equality  | [`ExpectError::BodyMismatch`] |

#![doc(html_root_url = "https://docs.rs/supertest/0.1.0")]

mod body;
mod compare;
mod error;
mod expect;
mod request;
mod response;
mod service;
mod transport;

pub use body::{serialize, Body, SerializedBody, JSON_CONTENT_TYPE};
pub use compare::{ExpectedBody, Json};
pub use error::{ExpectError, SerializeError, TransportError};
pub use request::{encode_query, Completion, Request};
pub use response::TransportResponse;
pub use service::{ResponseFuture, ServiceHandler, ServiceTransport};
pub use transport::{HttpTransport, Transport, TransportRequest};

pub use supertest_config::{ConfigLoader, SupertestConfig};
pub use supertest_telemetry::{init_logging, init_test_logging, LogConfig};
