//! Response body comparison.
//!
//! The type of the expected value selects the strategy:
//!
//! | Expected type         | Strategy |
//! |-----------------------|----------|
//! | `&str`, `String`      | Exact text, byte for byte |
//! | `serde_json::Value`   | Decode the body to a JSON tree and compare trees |
//! | [`Json<T>`]           | Decode the body into `T` and compare with `PartialEq` |
//!
//! Structured comparison needs `PartialEq` at compile time; there is no
//! fallback to comparing formatted strings.

use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::error::ExpectError;

/// An expectation on a buffered response body.
pub trait ExpectedBody {
    /// Compares `actual` against this expectation.
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError>;
}

impl<B: ExpectedBody + ?Sized> ExpectedBody for &B {
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError> {
        (**self).compare(actual)
    }
}

impl ExpectedBody for str {
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError> {
        compare_text(self, actual)
    }
}

impl ExpectedBody for String {
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError> {
        compare_text(self, actual)
    }
}

impl ExpectedBody for serde_json::Value {
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError> {
        let decoded: serde_json::Value =
            serde_json::from_slice(actual).map_err(|source| ExpectError::BodyDecode {
                expected: self.to_string(),
                actual: String::from_utf8_lossy(actual).into_owned(),
                source,
            })?;

        if *self == decoded {
            Ok(())
        } else {
            Err(ExpectError::BodyMismatch {
                expected: self.to_string(),
                actual: decoded.to_string(),
            })
        }
    }
}

/// Expects a JSON body that decodes into `T` and equals the wrapped value.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use supertest::{ExpectedBody, Json};
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// let expected = Json(User { id: 7, name: "Ada".to_string() });
/// assert!(expected.compare(br#"{"name":"Ada","id":7}"#).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> ExpectedBody for Json<T>
where
    T: DeserializeOwned + PartialEq + Debug,
{
    fn compare(&self, actual: &[u8]) -> Result<(), ExpectError> {
        let decoded: T = serde_json::from_slice(actual).map_err(|source| ExpectError::BodyDecode {
            expected: format!("{:?}", self.0),
            actual: String::from_utf8_lossy(actual).into_owned(),
            source,
        })?;

        if self.0 == decoded {
            Ok(())
        } else {
            Err(ExpectError::BodyMismatch {
                expected: format!("{:?}", self.0),
                actual: format!("{decoded:?}"),
            })
        }
    }
}

fn compare_text(expected: &str, actual: &[u8]) -> Result<(), ExpectError> {
    if expected.as_bytes() == actual {
        return Ok(());
    }

    Err(ExpectError::BodyMismatch {
        expected: format!("{expected:?}"),
        actual: format!("{:?}", String::from_utf8_lossy(actual)),
    })
}
