//! Retrying wrapper for transient failures.
//!
//! Whether a failure is worth retrying is decided by
//! [`ErrorKind::is_retryable`], the same rule callers see on
//! [`rsfga_client_domain::ClassifiedError::is_retryable`]. Conflict-class
//! failures (4xx other than 429) are therefore never retried.
//!
//! A transport error or 5xx does not prove the request was not applied. A
//! write sent with `on_duplicate: error` or `on_missing: error` that did
//! commit would come back as a 409 or 404 on replay, hiding the transient
//! failure behind a validation error. Such writes are only retried after a
//! 429, which the service returns before doing any work.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rsfga_client_domain::ErrorKind;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TransportResult;
use crate::request::{ApiRequest, ApiResponse};
use crate::traits::Transport;
use crate::wire::WriteRequestBody;

/// Exponential back-off settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay, doubled on every retry.
    pub min_wait: Duration,
    /// Upper bound for a single delay.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), jitter included.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self
            .min_wait
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        let min_wait_ms = u64::try_from(self.min_wait.as_millis()).unwrap_or(u64::MAX);
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=min_wait_ms));
        base.saturating_add(jitter).min(self.max_wait)
    }
}

/// Wraps a transport and retries retryable failures.
#[derive(Debug, Clone)]
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

/// Whether `request` can be replayed after an ambiguous failure. Bodies that
/// are not write payloads carry no conflict directives and always can.
fn replay_safe(request: &ApiRequest) -> bool {
    request
        .body
        .as_ref()
        .and_then(|body| WriteRequestBody::deserialize(body).ok())
        .map_or(true, |body| body.is_replay_safe())
}

#[async_trait]
impl<T: Transport> Transport for RetryTransport<T> {
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        let replay_safe = replay_safe(&request);
        let mut attempt = 0;
        loop {
            let result = self.inner.invoke(request.clone()).await;
            let kind = match &result {
                Ok(response) if response.is_success() => return result,
                Ok(response) => ErrorKind::from_status(Some(response.status)),
                Err(_) => ErrorKind::from_status(None),
            };

            if !kind.is_retryable() || attempt >= self.policy.max_retries {
                return result;
            }
            if !replay_safe && kind != ErrorKind::RateLimit {
                debug!(
                    operation = request.operation_name(),
                    path = %request.path,
                    kind = %kind,
                    "not retrying conflict-checked write after ambiguous failure"
                );
                return result;
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                operation = request.operation_name(),
                path = %request.path,
                kind = %kind,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "retrying request after transient failure"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::request::Method;
    use rsfga_client_domain::CallMetadata;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replies with the queued results in order, then 200.
    struct Sequence {
        replies: Mutex<Vec<TransportResult<ApiResponse>>>,
        calls: AtomicUsize,
    }

    impl Sequence {
        fn new(mut replies: Vec<TransportResult<ApiResponse>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for Sequence {
        async fn invoke(&self, _request: ApiRequest) -> TransportResult<ApiResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ApiResponse::new(200, Value::Null)))
        }
    }

    fn request() -> ApiRequest {
        ApiRequest::new(Method::Post, "/stores/s/write", CallMetadata::new("write"))
    }

    fn write_request(on_duplicate: &str, on_missing: &str) -> ApiRequest {
        request().with_body(json!({
            "writes": {
                "tuple_keys": [{"user": "user:anne", "relation": "viewer", "object": "doc:x"}],
                "on_duplicate": on_duplicate
            },
            "deletes": {
                "tuple_keys": [{"user": "user:bob", "relation": "viewer", "object": "doc:y"}],
                "on_missing": on_missing
            }
        }))
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            min_wait: Duration::from_millis(1),
            max_wait: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let transport = RetryTransport::new(
            Sequence::new(vec![
                Ok(ApiResponse::new(503, Value::Null)),
                Ok(ApiResponse::new(429, Value::Null)),
            ]),
            fast_policy(3),
        );

        let response = transport.invoke(request()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_transport_errors() {
        let transport = RetryTransport::new(
            Sequence::new(vec![Err(TransportError::Connection {
                message: "reset".to_string(),
            })]),
            fast_policy(1),
        );

        assert!(transport.invoke(request()).await.is_ok());
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_conflicts() {
        for status in [400, 401, 403, 404, 409] {
            let transport = RetryTransport::new(
                Sequence::new(vec![Ok(ApiResponse::new(status, Value::Null))]),
                fast_policy(3),
            );

            let response = transport.invoke(request()).await.unwrap();

            assert_eq!(response.status, status);
            assert_eq!(
                transport.inner().calls.load(Ordering::SeqCst),
                1,
                "status {status} must not be retried"
            );
        }
    }

    #[tokio::test]
    async fn test_strict_write_is_not_replayed_after_ambiguous_failure() {
        for (on_duplicate, on_missing) in [("error", "ignore"), ("ignore", "error")] {
            let transport = RetryTransport::new(
                Sequence::new(vec![
                    Err(TransportError::Timeout {
                        message: "timed out".to_string(),
                    }),
                    Ok(ApiResponse::new(409, Value::Null)),
                ]),
                fast_policy(3),
            );

            let result = transport.invoke(write_request(on_duplicate, on_missing)).await;

            assert!(matches!(result, Err(TransportError::Timeout { .. })));
            assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 1);
        }

        let transport = RetryTransport::new(
            Sequence::new(vec![Ok(ApiResponse::new(503, Value::Null))]),
            fast_policy(3),
        );
        let response = transport.invoke(write_request("error", "error")).await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_strict_write_is_retried_after_rate_limit() {
        let transport = RetryTransport::new(
            Sequence::new(vec![Ok(ApiResponse::new(429, Value::Null))]),
            fast_policy(3),
        );

        let response = transport.invoke(write_request("error", "error")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_idempotent_write_is_retried_after_ambiguous_failure() {
        let transport = RetryTransport::new(
            Sequence::new(vec![
                Err(TransportError::Timeout {
                    message: "timed out".to_string(),
                }),
                Ok(ApiResponse::new(502, Value::Null)),
            ]),
            fast_policy(3),
        );

        let response = transport.invoke(write_request("ignore", "ignore")).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let transport = RetryTransport::new(
            Sequence::new(vec![
                Ok(ApiResponse::new(500, Value::Null)),
                Ok(ApiResponse::new(500, Value::Null)),
                Ok(ApiResponse::new(500, Value::Null)),
            ]),
            fast_policy(2),
        );

        let response = transport.invoke(request()).await.unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(250),
        };
        assert!(policy.backoff(0) <= Duration::from_millis(200));
        assert!(policy.backoff(0) >= Duration::from_millis(100));
        assert_eq!(policy.backoff(9), Duration::from_millis(250));
    }

    #[test]
    fn test_disabled_policy() {
        assert_eq!(RetryPolicy::disabled().max_retries, 0);
    }
}
