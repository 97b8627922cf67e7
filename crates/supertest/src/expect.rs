//! Firing a request and judging the response.

use http::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::body::{self, SerializedBody};
use crate::compare::ExpectedBody;
use crate::error::ExpectError;
use crate::request::Request;
use crate::transport::TransportRequest;

impl Request {
    /// Sends the request and checks only the response status.
    ///
    /// Consumes the request. A registered [`done`](Request::done) callback
    /// runs exactly once with the outcome before this returns.
    ///
    /// # Panics
    ///
    /// Panics if no method and path were configured.
    pub fn expect(self, status: u16) -> Result<(), ExpectError> {
        self.evaluate(status, None)
    }

    /// Sends the request and checks both the response status and body.
    ///
    /// The type of `body` selects the comparison; see [`ExpectedBody`].
    /// The body is only compared once the status matches.
    ///
    /// # Panics
    ///
    /// Panics if no method and path were configured.
    pub fn expect_body<B: ExpectedBody>(self, status: u16, body: B) -> Result<(), ExpectError> {
        self.evaluate(status, Some(&body))
    }

    fn evaluate(mut self, status: u16, expected: Option<&dyn ExpectedBody>) -> Result<(), ExpectError> {
        assert!(
            self.target.is_some(),
            "request fired without a method and path; call get, post, put, delete or method first"
        );

        let completion = self.completion.take();
        let outcome = self.run(status, expected);

        if let Err(err) = &outcome {
            warn!(error = %err, "Expectation failed");
        }
        if let Some(completion) = completion {
            completion(outcome.as_ref().err());
        }

        outcome
    }

    fn run(self, status: u16, expected: Option<&dyn ExpectedBody>) -> Result<(), ExpectError> {
        let url = self.url().unwrap_or_default();
        let Self {
            target,
            body,
            mut headers,
            transport,
            ..
        } = self;
        let Some((method, _)) = target else {
            unreachable!("target checked before running");
        };

        let SerializedBody {
            bytes,
            content_type,
        } = match body {
            Some(body) => body::serialize(body)?,
            None => SerializedBody::default(),
        };

        if let Some(content_type) = content_type {
            let already_set = headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !already_set {
                headers.push((CONTENT_TYPE.as_str().to_string(), content_type.to_string()));
            }
        }

        debug!(
            method = %method,
            url = %url,
            headers = headers.len(),
            body_len = bytes.len(),
            "Sending request"
        );

        let response = transport.execute(TransportRequest {
            method,
            url,
            headers,
            body: bytes,
        })?;

        debug!(
            status = response.status_code(),
            body_len = response.body().len(),
            "Received response"
        );

        if response.status_code() != status {
            return Err(ExpectError::StatusMismatch {
                expected: status,
                actual: response.status_code(),
            });
        }

        match expected {
            Some(expected) => expected.compare(response.body()),
            None => Ok(()),
        }
    }
}
