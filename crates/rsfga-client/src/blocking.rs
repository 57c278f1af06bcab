//! Blocking client.
//!
//! Drives the same executor as [`Client`] on a private single-worker
//! runtime, so both flavors classify and chunk identically. The client may
//! be called and dropped from inside another tokio runtime of either flavor.

use std::future::Future;
use std::thread;

use rsfga_client_domain::{ClassifiedError, ConflictPolicy, Tuple, TupleChangeSet};
use rsfga_client_transport::{
    ApiRequest, ApiResponse, BlockingAdapter, BlockingTransport, Transport,
};
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

use crate::cancel::CancellationToken;
use crate::client::{Client, HttpStack};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::executor::{TransactionFailure, TransactionOutcome, TransactionSummary};

/// Blocking twin of [`Client`].
#[derive(Debug)]
pub struct BlockingClient<T> {
    inner: Client<T>,
    handle: Handle,
    // Only taken by `Drop`.
    runtime: Option<Runtime>,
}

impl BlockingClient<HttpStack> {
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        Self::wrap(Client::from_config(config)?)
    }
}

impl<B: BlockingTransport> BlockingClient<BlockingAdapter<B>> {
    /// Builds a client over a synchronous transport.
    pub fn from_blocking(config: ClientConfig, transport: B) -> ClientResult<Self> {
        Self::new(config, BlockingAdapter::new(transport))
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> ClientResult<Self> {
        Self::wrap(Client::new(config, transport)?)
    }

    fn wrap(inner: Client<T>) -> ClientResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("rsfga-client-blocking")
            .enable_all()
            .build()
            .map_err(|e| ClientError::Runtime {
                message: e.to_string(),
            })?;
        Ok(Self {
            inner,
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    /// The async client this one delegates to.
    pub fn as_async(&self) -> &Client<T> {
        &self.inner
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn transport(&self) -> &T {
        self.inner.transport()
    }

    pub fn execute_change_set(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
        operation_name: &str,
    ) -> TransactionOutcome {
        self.block_on(self.inner.execute_change_set(change_set, policy, operation_name))
    }

    pub fn execute_change_set_with_cancellation(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
        operation_name: &str,
        cancellation: &CancellationToken,
    ) -> TransactionOutcome {
        self.block_on(self.inner.execute_change_set_with_cancellation(
            change_set,
            policy,
            operation_name,
            cancellation,
        ))
    }

    pub fn write(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        self.block_on(self.inner.write(change_set, policy))
    }

    pub fn write_tuples(
        &self,
        tuples: Vec<Tuple>,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        self.block_on(self.inner.write_tuples(tuples, policy))
    }

    pub fn delete_tuples(
        &self,
        tuples: Vec<Tuple>,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        self.block_on(self.inner.delete_tuples(tuples, policy))
    }

    pub fn send(
        &self,
        operation_name: &str,
        request: ApiRequest,
    ) -> Result<ApiResponse, ClassifiedError> {
        self.block_on(self.inner.send(operation_name, request))
    }

    /// Runs `future` to completion on the private runtime.
    ///
    /// A multi-threaded caller runtime hands its worker off first. A
    /// current-thread caller cannot do that, so the future runs on a scoped
    /// thread while the caller blocks on the join.
    fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send,
        F::Output: Send,
    {
        match Handle::try_current() {
            Ok(caller) if caller.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.handle.block_on(future))
            }
            Ok(_) => thread::scope(|scope| {
                match scope.spawn(|| self.handle.block_on(future)).join() {
                    Ok(output) => output,
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }),
            Err(_) => self.handle.block_on(future),
        }
    }
}

impl<T> Drop for BlockingClient<T> {
    fn drop(&mut self) {
        // A plain drop blocks on the worker and panics inside async context.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
