//! Request body construction.
//!
//! A [`Body`] is one of a small closed set of inputs: text, raw bytes, a
//! readable stream, or a structured value encoded as JSON. The caller picks
//! the variant; nothing is inferred from runtime types.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use serde::Serialize;

use crate::error::SerializeError;

/// Content type attached to structured bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An outgoing request body.
pub struct Body {
    kind: Kind,
}

enum Kind {
    Text(String),
    Bytes(Bytes),
    Reader(Box<dyn Read + Send>),
    // Encoded when the body is built; a failure is reported when the request fires.
    Json(Result<Vec<u8>, serde_json::Error>),
}

impl Body {
    /// A text body sent verbatim.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: Kind::Text(text.into()),
        }
    }

    /// A raw byte body sent verbatim.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            kind: Kind::Bytes(bytes.into()),
        }
    }

    /// A body drained from a reader when the request fires.
    ///
    /// The bytes are passed through untouched; set any framing headers
    /// yourself.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            kind: Kind::Reader(Box::new(reader)),
        }
    }

    /// A structured body encoded as JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    /// use supertest::Body;
    ///
    /// let body = Body::json(&json!({"name": "Alice"}));
    /// assert!(body.is_json());
    /// ```
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self {
            kind: Kind::Json(serde_json::to_vec(value)),
        }
    }

    /// Returns true for structured bodies.
    pub fn is_json(&self) -> bool {
        matches!(self.kind, Kind::Json(_))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Kind::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Kind::Reader(_) => f.write_str("Reader(..)"),
            Kind::Json(Ok(encoded)) => f
                .debug_tuple("Json")
                .field(&String::from_utf8_lossy(encoded))
                .finish(),
            Kind::Json(Err(e)) => f.debug_tuple("Json").field(&e.to_string()).finish(),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::bytes(bytes)
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Self::bytes(bytes)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::bytes(bytes)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::json(&value)
    }
}

/// A body ready to hand to a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedBody {
    /// Bytes to send.
    pub bytes: Bytes,
    /// Content type implied by the body kind, if any.
    pub content_type: Option<&'static str>,
}

/// Produces the bytes for an outgoing body.
///
/// Text and raw bytes pass through unchanged, readers are drained, and
/// structured values yield their JSON encoding.
pub fn serialize(body: Body) -> Result<SerializedBody, SerializeError> {
    match body.kind {
        Kind::Text(text) => Ok(SerializedBody {
            bytes: Bytes::from(text),
            content_type: None,
        }),
        Kind::Bytes(bytes) => Ok(SerializedBody {
            bytes,
            content_type: None,
        }),
        Kind::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(SerializedBody {
                bytes: Bytes::from(buf),
                content_type: None,
            })
        }
        Kind::Json(encoded) => Ok(SerializedBody {
            bytes: Bytes::from(encoded?),
            content_type: Some(JSON_CONTENT_TYPE),
        }),
    }
}
