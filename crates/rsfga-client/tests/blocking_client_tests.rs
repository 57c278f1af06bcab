//! Blocking client behavior and parity with the async client.
//!
//! Both flavors run the same executor, so for any scripted response they must
//! produce identical outcomes.

mod common;

use proptest::prelude::*;
use rsfga_client::{
    BlockingClient, Client, ConflictPolicy, ErrorKind, MemoryTransport, OnDuplicateWrite,
    TransactionOutcome, TupleChangeSet,
};
use rsfga_client_transport::{ApiResponse, TransportResult};
use serde_json::json;

use common::{
    anne, bob, config, connection_refused, failed, ok, viewers, ScriptedTransport, STORE_ID,
};

fn run_both(
    replies: Vec<TransportResult<ApiResponse>>,
    change_set: &TupleChangeSet,
) -> (TransactionOutcome, TransactionOutcome) {
    let async_transport = ScriptedTransport::with_replies(replies.clone());
    let async_client = Client::new(config(100), async_transport).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let async_outcome = runtime.block_on(async_client.execute_change_set(
        change_set,
        Some(ConflictPolicy::strict()),
        "write",
    ));

    let blocking_transport = ScriptedTransport::with_replies(replies);
    let blocking_client = BlockingClient::from_blocking(config(100), blocking_transport).unwrap();
    let blocking_outcome =
        blocking_client.execute_change_set(change_set, Some(ConflictPolicy::strict()), "write");

    (async_outcome, blocking_outcome)
}

/// Test: Duplicate IGNORE scenario through the blocking client
#[test]
fn test_blocking_duplicate_write_ignored() {
    let client =
        BlockingClient::new(config(100), MemoryTransport::with_store(STORE_ID)).unwrap();
    let policy = ConflictPolicy::strict().with_on_duplicate_write(OnDuplicateWrite::Ignore);

    assert!(client.write_tuples(vec![anne()], Some(policy)).is_ok());
    assert!(client.write_tuples(vec![anne()], Some(policy)).is_ok());
    assert_eq!(client.transport().tuples(STORE_ID), vec![anne()]);
}

/// Test: Missing delete through the blocking client is NotFound tagged "delete"
#[test]
fn test_blocking_missing_delete_is_not_found() {
    let client =
        BlockingClient::new(config(100), MemoryTransport::with_store(STORE_ID)).unwrap();

    let failure = client.delete_tuples(vec![bob()], None).unwrap_err();

    assert_eq!(failure.error().kind(), ErrorKind::NotFound);
    assert_eq!(failure.error().operation_name(), Some("delete"));
}

/// Test: A synchronous transport drives the same chunking
#[test]
fn test_blocking_transport_chunks_in_order() {
    let transport = ScriptedTransport::with_replies([
        Ok(ok()),
        Ok(failed(503, "internal_error", "unavailable")),
    ]);
    let client = BlockingClient::from_blocking(config(100), transport.clone()).unwrap();
    let change_set = TupleChangeSet::writes_only(viewers(0, 250)).unwrap();

    let failure = client.write(&change_set, None).unwrap_err();

    assert_eq!(failure.chunk_index(), 1);
    assert!(failure.error().is_server_error());
    assert!(failure.error().is_retryable());
    assert_eq!(transport.call_count(), 2);
}

/// Test: The blocking client can be used from inside a multi-threaded runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_client_inside_runtime() {
    let transport = ScriptedTransport::new();
    let client = BlockingClient::from_blocking(config(100), transport.clone()).unwrap();

    let summary = client.write_tuples(viewers(0, 3), None).unwrap();

    assert_eq!(summary.writes, 3);
    assert_eq!(transport.call_count(), 1);
    drop(client);
}

/// Test: The blocking client can be called and dropped inside a current-thread runtime
#[tokio::test]
async fn test_blocking_client_inside_current_thread_runtime() {
    let client =
        BlockingClient::new(config(100), MemoryTransport::with_store(STORE_ID)).unwrap();

    let summary = client.write_tuples(vec![anne()], None).unwrap();
    let failure = client.delete_tuples(vec![bob()], None).unwrap_err();

    assert_eq!(summary.writes, 1);
    assert_eq!(failure.error().kind(), ErrorKind::NotFound);
    assert_eq!(client.transport().tuples(STORE_ID), vec![anne()]);
    drop(client);

    // The caller's runtime is still usable afterwards.
    tokio::task::yield_now().await;
}

/// Test: A retrying transport's back-off timers run on the blocking client's runtime
#[test]
fn test_blocking_client_retries_with_timers() {
    use rsfga_client_transport::{RetryPolicy, RetryTransport};
    use std::time::Duration;

    let transport = ScriptedTransport::with_replies([
        Ok(failed(503, "internal_error", "unavailable")),
        Ok(ok()),
    ]);
    let policy = RetryPolicy {
        max_retries: 2,
        min_wait: Duration::from_millis(5),
        max_wait: Duration::from_millis(10),
    };
    let client = BlockingClient::new(
        config(100),
        RetryTransport::new(transport.clone(), policy),
    )
    .unwrap();

    let request = rsfga_client::ApiRequest::new(
        rsfga_client::Method::Get,
        format!("/stores/{STORE_ID}"),
        rsfga_client::CallMetadata::default(),
    );
    let response = client.send("get_store", request).unwrap();

    assert!(response.is_success());
    assert_eq!(transport.call_count(), 2);
}

/// Test: Blocking send classifies like async send
#[test]
fn test_blocking_send_classifies() {
    let transport = ScriptedTransport::with_replies([Ok(failed(429, "rate_limited", "slow down"))]);
    let client = BlockingClient::from_blocking(config(100), transport).unwrap();
    let request = rsfga_client::ApiRequest::new(
        rsfga_client::Method::Post,
        format!("/stores/{STORE_ID}/check"),
        rsfga_client::CallMetadata::default(),
    )
    .with_body(json!({}));

    let err = client.send("check", request).unwrap_err();

    assert!(err.is_rate_limit_error());
    assert!(err.is_retryable());
    assert_eq!(err.operation_name(), Some("check"));
    assert_eq!(err.request_id(), Some(common::REQUEST_ID));
}

/// Test: Transport failures are identical in both flavors
#[test]
fn test_transport_failure_parity() {
    let change_set = TupleChangeSet::writes_only(viewers(0, 1)).unwrap();
    let (async_outcome, blocking_outcome) = run_both(vec![Err(connection_refused())], &change_set);

    assert_eq!(async_outcome, blocking_outcome);
    let failure = async_outcome.into_result().unwrap_err();
    assert_eq!(failure.error().kind(), ErrorKind::Transport);
    assert!(failure.error().request_id().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: For any scripted status on any chunk, both clients agree
    #[test]
    fn prop_blocking_and_async_outcomes_match(
        status in 200u16..600,
        failing_chunk in 0usize..3,
        code in "[a-z_]{0,20}",
        headers in any::<bool>(),
    ) {
        let response = if headers {
            failed(status, &code, "scripted")
        } else {
            ApiResponse::new(status, json!({ "code": code }))
        };
        let mut replies: Vec<TransportResult<ApiResponse>> = vec![Ok(ok()); failing_chunk];
        replies.push(Ok(response));

        let change_set = TupleChangeSet::writes_only(viewers(0, 250)).unwrap();
        let (async_outcome, blocking_outcome) = run_both(replies, &change_set);

        prop_assert_eq!(&async_outcome, &blocking_outcome);
        if !(200..300).contains(&status) {
            let failure = async_outcome.into_result().unwrap_err();
            prop_assert_eq!(failure.chunk_index(), failing_chunk);
            prop_assert_eq!(failure.error().status(), Some(status));
            prop_assert_eq!(failure.error().kind(), ErrorKind::from_status(Some(status)));
        }
    }
}
