//! Error types for firing requests and judging responses.

use thiserror::Error;

/// The outcome of a failed expectation.
///
/// Exactly one error is reported per evaluation: the first failure in the
/// order serialization, transport, status, body decoding, body comparison.
#[derive(Debug, Error)]
pub enum ExpectError {
    /// The request body could not be produced. No request was sent.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] SerializeError),

    /// The transport failed to execute the request.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// The response status differs from the expected one.
    #[error("Expected {expected}, was {actual}")]
    StatusMismatch {
        /// Expected status code.
        expected: u16,
        /// Status code the server returned.
        actual: u16,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Expected: {expected}, but got {actual:?}. {source}")]
    BodyDecode {
        /// Rendering of the expected value.
        expected: String,
        /// Raw response body as text.
        actual: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// The response body differs from the expected one.
    #[error("{expected} does not equal {actual}")]
    BodyMismatch {
        /// Rendering of the expected value.
        expected: String,
        /// Rendering of the actual value.
        actual: String,
    },
}

impl ExpectError {
    /// Returns true if the server answered with an unexpected status.
    pub fn is_status_mismatch(&self) -> bool {
        matches!(self, Self::StatusMismatch { .. })
    }

    /// Returns true if the response body failed to decode or compare.
    pub fn is_body_failure(&self) -> bool {
        matches!(self, Self::BodyDecode { .. } | Self::BodyMismatch { .. })
    }
}

/// Errors producing the outgoing request body.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// Structured encoding failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a streamed body failed.
    #[error("reading body stream failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Errors reported by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target URL could not be parsed.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL that was rejected.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The runtime driving the request could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The request could not be completed (connection refused, reset, ...).
    #[error("{0}")]
    Request(String),

    /// No response arrived before the deadline.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),
}
