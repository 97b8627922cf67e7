//! Request execution.
//!
//! The evaluator hands a [`TransportRequest`] to a [`Transport`] and judges
//! the buffered [`TransportResponse`] it gets back. [`HttpTransport`] talks
//! to a real server over HTTP/1.1; [`ServiceTransport`](crate::ServiceTransport)
//! dispatches in memory. Any closure with the right signature is a transport
//! too, which keeps unit tests free of sockets.

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use supertest_config::TransportConfig;

use crate::error::TransportError;
use crate::response::TransportResponse;

/// Executes requests on behalf of the evaluator.
///
/// Implementations block the calling thread until the response body has
/// been fully buffered or the request has failed.
pub trait Transport: Send + Sync {
    /// Executes `request` and returns the buffered response.
    fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync,
{
    fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self(request)
    }
}

/// A fully specified request, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the encoded query string
    pub url: String,
    /// Header pairs in sending order; names may repeat
    pub headers: Vec<(String, String)>,
    /// Request body, empty when none was set
    pub body: Bytes,
}

impl TransportRequest {
    /// Returns every value sent for `name`, compared case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Converts this request to an HTTP request, validating the URL and headers.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>, TransportError> {
        let uri: Uri = self.url.parse().map_err(|e: http::uri::InvalidUri| {
            TransportError::InvalidUrl {
                url: self.url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;

        let headers = request.headers_mut();
        for (name, value) in self.headers {
            let header_name =
                HeaderName::try_from(name.as_str()).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::try_from(value.as_str()).map_err(|e| TransportError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.append(header_name, header_value);
        }

        Ok(request)
    }
}

/// Blocking HTTP/1.1 transport built on the hyper client.
///
/// Every request runs on its own current-thread Tokio runtime and its own
/// client, so nothing is pooled between requests. It blocks the calling
/// thread; from inside an async runtime the exchange is moved to a helper
/// thread so `#[tokio::test]` functions can call it directly.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use supertest::{HttpTransport, Request};
///
/// let transport = HttpTransport::new()
///     .with_timeout(Duration::from_secs(2))
///     .with_default_header("x-api-key", "local-dev-key");
///
/// Request::with_transport("http://127.0.0.1:8080", transport)
///     .get("/health")
///     .expect(200)
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Creates a transport with the default `transport` configuration: a
    /// 30 second deadline and no default headers.
    pub fn new() -> Self {
        Self::from_config(&TransportConfig::default())
    }

    /// Creates a transport from the `transport` configuration section.
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            timeout: config.timeout(),
            default_headers: config.header_pairs(),
        }
    }

    /// Sets the deadline for each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the deadline, waiting as long as the server takes.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Adds a header sent before each request's own headers.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the configured deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the default headers in sending order.
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    async fn send(&self, request: http::Request<Full<Bytes>>) -> Result<TransportResponse, TransportError> {
        let client = Client::builder(TokioExecutor::new()).build_http::<Full<Bytes>>();

        let exchange = async {
            let response = client
                .request(request)
                .await
                .map_err(|e| TransportError::Request(error_chain(&e)))?;
            TransportResponse::from_http(response).await
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| TransportError::Timeout(timeout))?,
            None => exchange.await,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, mut request: TransportRequest) -> Result<TransportResponse, TransportError> {
        if !self.default_headers.is_empty() {
            let mut headers = self.default_headers.clone();
            headers.append(&mut request.headers);
            request.headers = headers;
        }

        let http_request = request.into_http_request()?.map(Full::new);
        block_on_exchange(|| self.send(http_request))
    }
}

/// Drives `exchange` to completion on a fresh current-thread runtime.
///
/// When the caller is already inside a Tokio runtime, the exchange runs on a
/// scoped thread that owns the new runtime, since a runtime cannot be
/// started on a thread that is driving one. A panic in the exchange is
/// resumed on the calling thread.
pub(crate) fn block_on_exchange<F, Fut, T>(exchange: F) -> Result<T, TransportError>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T, TransportError>>,
    T: Send,
{
    let drive = move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;
        runtime.block_on(exchange())
    };

    if tokio::runtime::Handle::try_current().is_err() {
        return drive();
    }

    std::thread::scope(|scope| {
        scope
            .spawn(drive)
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

/// Renders an error with its chain of sources, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
