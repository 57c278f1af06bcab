//! Chunked, ordered execution of a change set.
//!
//! ```text
//! TupleChangeSet ──► Batcher ──► chunk 0 ──► chunk 1 ──► ... ──► Success
//!                                   │           │
//!                                   └───────────┴──► classify ──► Failure{error, chunk_index}
//! ```
//!
//! Chunks are sent one at a time. Chunk `i` is only dispatched after chunk
//! `i - 1` succeeded, so on failure `chunk_index` is also the number of chunks
//! already committed. Conflict directives travel to the service on every
//! chunk; nothing is suppressed or retried here.

use futures::future::{select, Either};
use rsfga_client_domain::{
    classify_call, Batcher, CallMetadata, ClassifiedError, ConflictPolicy, TupleChangeSet,
};
use rsfga_client_transport::wire::{write_path, WriteRequestBody};
use rsfga_client_transport::{ApiRequest, Method, Transport};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;

/// Totals of a fully applied change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionSummary {
    pub chunks_applied: usize,
    pub writes: usize,
    pub deletes: usize,
}

/// The first failed chunk of a transaction.
///
/// Chunks before `chunk_index` were committed by the service and are not
/// rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transaction failed at chunk {chunk_index}: {}", .error.kind())]
pub struct TransactionFailure {
    #[source]
    error: ClassifiedError,
    chunk_index: usize,
}

impl TransactionFailure {
    pub fn new(error: ClassifiedError, chunk_index: usize) -> Self {
        Self { error, chunk_index }
    }

    pub fn error(&self) -> &ClassifiedError {
        &self.error
    }

    /// 0-based index of the failed chunk.
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    pub fn chunks_committed(&self) -> usize {
        self.chunk_index
    }

    pub fn into_error(self) -> ClassifiedError {
        self.error
    }
}

/// Result of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Success(TransactionSummary),
    Failure(TransactionFailure),
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<TransactionSummary, TransactionFailure> {
        match self {
            TransactionOutcome::Success(summary) => Ok(summary),
            TransactionOutcome::Failure(failure) => Err(failure),
        }
    }
}

/// Runs change sets against a transport, one chunk call at a time.
#[derive(Debug)]
pub struct TransactionExecutor<'t, T: ?Sized> {
    transport: &'t T,
    batcher: Batcher,
}

impl<'t, T: Transport + ?Sized> TransactionExecutor<'t, T> {
    pub fn new(transport: &'t T, batcher: Batcher) -> Self {
        Self { transport, batcher }
    }

    pub fn batcher(&self) -> Batcher {
        self.batcher
    }

    /// Applies `change_set` under `policy`.
    ///
    /// `call` tags every request and supplies the store (required) and model
    /// ids. Cancellation is checked before each chunk and raced against the
    /// call in flight; a cancelled call is abandoned, not awaited.
    pub async fn execute(
        &self,
        change_set: &TupleChangeSet,
        policy: ConflictPolicy,
        call: &CallMetadata,
        cancellation: &CancellationToken,
    ) -> TransactionOutcome {
        let chunks = self.batcher.split(change_set);
        if chunks.is_empty() {
            debug!(operation = %call.operation_name, "empty change set, nothing to send");
            return TransactionOutcome::Success(TransactionSummary::default());
        }

        let Some(store_id) = call.store_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            return failure(
                ClassifiedError::invalid_input("a store id is required to write tuples", call),
                0,
            );
        };
        let path = write_path(store_id);

        debug!(
            operation = %call.operation_name,
            store_id,
            chunks = chunks.len(),
            writes = change_set.writes().len(),
            deletes = change_set.deletes().len(),
            on_duplicate = %policy.on_duplicate_write,
            on_missing = %policy.on_missing_delete,
            "executing change set"
        );

        let mut summary = TransactionSummary::default();
        for chunk in &chunks {
            let index = chunk.index();
            if cancellation.is_cancelled() {
                return cancelled(call, index);
            }

            let body = WriteRequestBody::for_chunk(
                chunk,
                policy,
                call.authorization_model_id.as_deref(),
            );
            let body = match serde_json::to_value(&body) {
                Ok(body) => body,
                Err(err) => {
                    return failure(ClassifiedError::invalid_input(err.to_string(), call), index)
                }
            };
            let request = ApiRequest::new(Method::Post, path.clone(), call.clone()).with_body(body);

            let in_flight = self.transport.invoke(request);
            let cancel_signal = std::pin::pin!(cancellation.cancelled());
            let result = match select(in_flight, cancel_signal).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => return cancelled(call, index),
            };

            let error = match result {
                Ok(response) if response.is_success() => {
                    debug!(
                        operation = %call.operation_name,
                        chunk_index = index,
                        tuples = chunk.len(),
                        "chunk applied"
                    );
                    summary.chunks_applied += 1;
                    summary.writes += chunk.writes().len();
                    summary.deletes += chunk.deletes().len();
                    continue;
                }
                Ok(response) => classify_call(
                    Some(response.status),
                    &response.body,
                    Some(&response.headers),
                    call,
                ),
                Err(err) => ClassifiedError::transport(err.to_string(), call),
            };
            return failure(error, index);
        }

        info!(
            operation = %call.operation_name,
            chunks = summary.chunks_applied,
            writes = summary.writes,
            deletes = summary.deletes,
            "change set applied"
        );
        TransactionOutcome::Success(summary)
    }
}

fn failure(error: ClassifiedError, chunk_index: usize) -> TransactionOutcome {
    warn!(
        operation = error.operation_name().unwrap_or_default(),
        chunk_index,
        kind = %error.kind(),
        status = error.status(),
        code = error.code(),
        request_id = error.request_id(),
        "transaction failed"
    );
    TransactionOutcome::Failure(TransactionFailure::new(error, chunk_index))
}

fn cancelled(call: &CallMetadata, chunk_index: usize) -> TransactionOutcome {
    failure(ClassifiedError::cancelled(call), chunk_index)
}
