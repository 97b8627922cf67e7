//! In-memory transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde_json::json;

use crate::body::JSON_CONTENT_TYPE;
use crate::error::TransportError;
use crate::response::TransportResponse;
use crate::transport::{block_on_exchange, Transport, TransportRequest};

/// Future returned by a [`ServiceHandler`].
pub type ResponseFuture = Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>>;

/// Handler function type for the in-memory transport.
pub type ServiceHandler = Arc<dyn Fn(http::Request<Bytes>) -> ResponseFuture + Send + Sync>;

/// A transport that hands requests straight to an async handler.
///
/// No server is started and no port is bound, which makes it the fastest
/// way to exercise request building and response checks.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use http_body_util::Full;
/// use supertest::{Request, ServiceTransport};
///
/// let transport = ServiceTransport::new(|_req| async move {
///     http::Response::builder()
///         .status(200)
///         .body(Full::new(Bytes::from("pong")))
///         .unwrap()
/// });
///
/// Request::with_transport("http://service.test", transport)
///     .get("/ping")
///     .expect_body(200, "pong")
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ServiceTransport {
    handler: ServiceHandler,
}

impl ServiceTransport {
    /// Creates a transport from an async handler.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(http::Request<Bytes>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = http::Response<Full<Bytes>>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |req: http::Request<Bytes>| -> ResponseFuture { Box::pin(handler(req)) }),
        }
    }

    /// Creates a transport that describes each request back as JSON.
    ///
    /// The response is `200 OK` with a body of the form
    /// `{"method", "path", "query", "headers": [[name, value], ...], "body"}`.
    pub fn echo() -> Self {
        Self::new(|req| async move {
            let headers: Vec<(String, String)> = req
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();

            let body = json!({
                "method": req.method().as_str(),
                "path": req.uri().path(),
                "query": req.uri().query().unwrap_or_default(),
                "headers": headers,
                "body": String::from_utf8_lossy(req.body()),
            });

            let mut response = http::Response::new(Full::new(Bytes::from(body.to_string())));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            );
            response
        })
    }

    /// Creates a transport that always returns a fixed response.
    pub fn fixed_response(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(move |_req| {
            let body = body.clone();
            async move {
                let mut response = http::Response::new(Full::new(Bytes::from(body)));
                *response.status_mut() = status;
                response
            }
        })
    }
}

impl std::fmt::Debug for ServiceTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceTransport").finish_non_exhaustive()
    }
}

impl Transport for ServiceTransport {
    fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let http_request = request.into_http_request()?;
        let handler = Arc::clone(&self.handler);

        block_on_exchange(move || async move {
            let response = (handler)(http_request).await;
            TransportResponse::from_http(response).await
        })
    }
}
