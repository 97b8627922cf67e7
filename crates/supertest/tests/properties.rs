//! Property tests over the evaluator, using in-process transports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::StatusCode;
use proptest::prelude::*;
use serde_json::{json, Value};
use supertest::{Request, TransportError, TransportRequest, TransportResponse};

fn answering(
    status: u16,
    body: String,
) -> impl Fn(TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync {
    move |_| {
        Ok(TransportResponse::with_status(
            StatusCode::from_u16(status).unwrap(),
            body.clone(),
        ))
    }
}

fn status() -> impl Strategy<Value = u16> {
    100u16..600
}

proptest! {
    #[test]
    fn matching_status_without_body_passes(code in status(), body in ".*") {
        let result = Request::with_transport("http://h", answering(code, body))
            .get("/")
            .expect(code);
        prop_assert!(result.is_ok());
    }

    #[test]
    fn mismatch_message_names_both_codes(expected in status(), actual in status(), with_body in any::<bool>()) {
        prop_assume!(expected != actual);

        let request = Request::with_transport("http://h", answering(actual, String::new())).get("/");
        let err = if with_body {
            request.expect_body(expected, "").unwrap_err()
        } else {
            request.expect(expected).unwrap_err()
        };

        let message = err.to_string();
        prop_assert!(err.is_status_mismatch());
        prop_assert!(message.contains(&expected.to_string()));
        prop_assert!(message.contains(&actual.to_string()));
    }

    #[test]
    fn text_comparison_is_exact(text in "[a-z]{0,12}", suffix in "[ \n]{1,3}") {
        let padded = format!("{text}{suffix}");
        let transport = answering(200, padded);
        let result = Request::with_transport("http://h", transport)
            .get("/")
            .expect_body(200, text.as_str());
        prop_assert!(result.is_err());
    }

    #[test]
    fn json_comparison_ignores_key_order(keys in proptest::collection::btree_set("[a-z]{1,6}", 1..6)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let expected: Value = keys.iter().map(|k| (k.clone(), json!(k.len()))).collect::<serde_json::Map<_, _>>().into();

        // Render the body with keys in reverse order.
        let members: Vec<String> = keys
            .iter()
            .rev()
            .map(|k| format!("{}:{}", json!(k), k.len()))
            .collect();
        let body = format!("{{{}}}", members.join(","));

        let result = Request::with_transport("http://h", answering(200, body))
            .get("/")
            .expect_body(200, expected);
        prop_assert!(result.is_ok());
    }

    #[test]
    fn done_runs_once_with_the_returned_outcome(code in status(), expected in status()) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));
        let (counter, sink) = (Arc::clone(&calls), Arc::clone(&seen));

        let result = Request::with_transport("http://h", answering(code, String::new()))
            .get("/")
            .done(move |err| {
                counter.fetch_add(1, Ordering::SeqCst);
                *sink.lock().unwrap() = Some(err.map(ToString::to_string));
            })
            .expect(expected);

        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
        let observed = seen.lock().unwrap().clone();
        prop_assert_eq!(observed, Some(result.err().map(|e| e.to_string())));
    }
}
