//! Request building.

use std::fmt;
use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use serde::Serialize;
use supertest_config::SupertestConfig;

use crate::body::Body;
use crate::error::ExpectError;
use crate::transport::{HttpTransport, Transport};

/// Callback invoked once with the outcome of an evaluation.
pub type Completion = Box<dyn FnOnce(Option<&ExpectError>) + Send>;

/// A request under construction.
///
/// Every configuration call records state and returns the request, so a test
/// reads as a single chain ending in [`expect`](Request::expect) or
/// [`expect_body`](Request::expect_body). Nothing is validated or sent until
/// then, and firing consumes the request.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
/// use supertest::Request;
///
/// Request::new("http://127.0.0.1:8080")
///     .post("/users")
///     .set("Authorization", "Bearer token")
///     .query("notify", "false")
///     .send(json!({"name": "Alice"}))
///     .expect_body(201, json!({"id": 1, "name": "Alice"}))
///     .unwrap();
/// ```
#[must_use]
pub struct Request {
    pub(crate) base: String,
    pub(crate) target: Option<(Method, String)>,
    pub(crate) body: Option<Body>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) query: IndexMap<String, Vec<String>>,
    pub(crate) completion: Option<Completion>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl Request {
    /// Creates a request against `base` using the default [`HttpTransport`].
    ///
    /// This behaves like [`from_config`](Request::from_config) with
    /// `SupertestConfig::default()`, including its 30 second deadline.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_shared_transport(base, Arc::new(HttpTransport::new()))
    }

    /// Creates a request against `base` using `transport`.
    pub fn with_transport(base: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(base, Arc::new(transport))
    }

    /// Creates a request that shares a transport with other requests.
    pub fn with_shared_transport(base: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: base.into(),
            target: None,
            body: None,
            headers: Vec::new(),
            query: IndexMap::new(),
            completion: None,
            transport,
        }
    }

    /// Creates a request whose [`HttpTransport`] follows `config.transport`.
    pub fn from_config(base: impl Into<String>, config: &SupertestConfig) -> Self {
        Self::with_transport(base, HttpTransport::from_config(&config.transport))
    }

    /// Sets the method and path. Replaces any earlier choice.
    pub fn method(mut self, method: Method, path: impl Into<String>) -> Self {
        self.target = Some((method, path.into()));
        self
    }

    /// Targets `path` with GET.
    pub fn get(self, path: impl Into<String>) -> Self {
        self.method(Method::GET, path)
    }

    /// Targets `path` with POST.
    pub fn post(self, path: impl Into<String>) -> Self {
        self.method(Method::POST, path)
    }

    /// Targets `path` with PUT.
    pub fn put(self, path: impl Into<String>) -> Self {
        self.method(Method::PUT, path)
    }

    /// Targets `path` with DELETE.
    pub fn delete(self, path: impl Into<String>) -> Self {
        self.method(Method::DELETE, path)
    }

    /// Targets `path` with PATCH.
    pub fn patch(self, path: impl Into<String>) -> Self {
        self.method(Method::PATCH, path)
    }

    /// Targets `path` with OPTIONS.
    pub fn options(self, path: impl Into<String>) -> Self {
        self.method(Method::OPTIONS, path)
    }

    /// Targets `path` with HEAD.
    pub fn head(self, path: impl Into<String>) -> Self {
        self.method(Method::HEAD, path)
    }

    /// Sets the request body. Replaces any earlier body.
    ///
    /// Strings and byte buffers are sent verbatim and `serde_json::Value`s
    /// are encoded as JSON; see [`Body`] for the full set.
    pub fn send(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a structured body encoded as JSON.
    ///
    /// An encoding failure is reported when the request fires.
    pub fn send_json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.send(Body::json(value))
    }

    /// Appends a header. Repeating a name sends every value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends a query parameter. Repeating a name sends every value.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Registers a callback run once with the outcome, just before
    /// [`expect`](Request::expect) or [`expect_body`](Request::expect_body)
    /// returns.
    ///
    /// The callback receives `None` on success and the same error that is
    /// returned otherwise. It runs on the calling thread.
    pub fn done(mut self, completion: impl FnOnce(Option<&ExpectError>) + Send + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }

    /// Returns the configured method, if any.
    pub fn method_ref(&self) -> Option<&Method> {
        self.target.as_ref().map(|(method, _)| method)
    }

    /// Returns the configured path, if any.
    pub fn path(&self) -> Option<&str> {
        self.target.as_ref().map(|(_, path)| path.as_str())
    }

    /// Returns the accumulated headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        encode_query(&self.query)
    }

    /// Returns the URL the request will be sent to, if a path is set.
    ///
    /// The `?` separator is always present, even with no parameters.
    pub fn url(&self) -> Option<String> {
        self.path().map(|path| format!("{}{}?{}", self.base, path, self.query_string()))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("base", &self.base)
            .field("target", &self.target)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("completion", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

/// Encodes query parameters as `name=value` pairs joined by `&`.
///
/// Names keep their first-insertion order and each name's values keep
/// theirs. Both sides are percent-encoded.
pub fn encode_query(query: &IndexMap<String, Vec<String>>) -> String {
    query
        .iter()
        .flat_map(|(name, values)| {
            values.iter().map(move |value| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
        })
        .collect::<Vec<_>>()
        .join("&")
}
