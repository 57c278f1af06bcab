//! Property-based tests for classification.

use proptest::prelude::*;
use serde_json::{json, Value};

use super::*;

proptest! {
    #[test]
    fn test_retryable_exactly_for_rate_limit_server_and_transport(
        status in prop::option::of(100u16..600),
        code in "[a-z_]{0,20}",
        message in ".{0,40}",
    ) {
        let body = json!({"code": code, "message": message});
        let err = classify(status, &body, &ResponseHeaders::new(), "write");

        let expected = matches!(
            err.kind(),
            ErrorKind::RateLimit | ErrorKind::Server | ErrorKind::Transport
        );
        prop_assert_eq!(err.is_retryable(), expected);
        prop_assert_eq!(err.is_retryable(), err.kind().is_retryable());
    }

    #[test]
    fn test_client_errors_are_never_server_or_transport(status in 400u16..500) {
        let err = classify(Some(status), &Value::Null, &ResponseHeaders::new(), "write");
        prop_assert!(!err.is_server_error());
        prop_assert!(!err.is_transport_error());
        prop_assert_eq!(err.is_retryable(), status == 429);
    }

    #[test]
    fn test_request_id_comes_only_from_headers(
        request_id in prop::option::of("[a-z0-9-]{1,36}"),
        store_id in prop::option::of("[A-Z0-9]{1,26}"),
    ) {
        let mut headers = ResponseHeaders::new();
        if let Some(id) = &request_id {
            headers.insert("fga-request-id", id.clone());
        }
        let mut call = CallMetadata::new("write");
        if let Some(id) = &store_id {
            call = call.with_store_id(id.clone());
        }

        let with_response = classify_call(Some(400), &Value::Null, Some(&headers), &call);
        let without_response = classify_call(None, &Value::Null, None, &call);

        prop_assert_eq!(with_response.request_id(), request_id.as_deref());
        prop_assert_eq!(without_response.request_id(), None);
        prop_assert_eq!(without_response.store_id(), store_id.as_deref());
    }
}
