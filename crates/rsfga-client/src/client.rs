//! Async client.

use rsfga_client_domain::{
    classify_call, Batcher, CallMetadata, ClassifiedError, ConflictPolicy, Tuple, TupleChangeSet,
};
use rsfga_client_transport::{ApiRequest, ApiResponse, HttpTransport, RetryTransport, Transport};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::executor::{
    TransactionExecutor, TransactionFailure, TransactionOutcome, TransactionSummary,
};

/// Transport stack built from configuration: HTTP with retries.
pub type HttpStack = RetryTransport<HttpTransport>;

/// Operation name used for write transactions.
pub const WRITE_OPERATION: &str = "write";
/// Operation name used for delete-only transactions.
pub const DELETE_OPERATION: &str = "delete";

/// Write-transaction client over any [`Transport`].
///
/// A `policy` of `None` falls back to the configured default policy.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
    batcher: Batcher,
}

impl Client<HttpStack> {
    /// Builds an HTTP client with retries from configuration.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = HttpTransport::new(&config.connection.api_url, config.request_timeout())?;
        let transport = RetryTransport::new(http, config.retry_policy());
        Self::new(config, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> ClientResult<Self> {
        config.validate()?;
        let batcher = Batcher::try_new(config.write.max_tuples_per_call)?;
        Ok(Self {
            transport,
            config,
            batcher,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call-site metadata for `operation_name` against the configured store.
    pub fn call_metadata(&self, operation_name: &str) -> CallMetadata {
        let call =
            CallMetadata::new(operation_name).with_store_id(&self.config.connection.store_id);
        match &self.config.connection.authorization_model_id {
            Some(model_id) => call.with_authorization_model_id(model_id),
            None => call,
        }
    }

    pub async fn execute_change_set(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
        operation_name: &str,
    ) -> TransactionOutcome {
        self.execute_change_set_with_cancellation(
            change_set,
            policy,
            operation_name,
            &CancellationToken::new(),
        )
        .await
    }

    pub async fn execute_change_set_with_cancellation(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
        operation_name: &str,
        cancellation: &CancellationToken,
    ) -> TransactionOutcome {
        let policy = policy.unwrap_or_else(|| self.config.default_policy());
        let call = self.call_metadata(operation_name);
        TransactionExecutor::new(&self.transport, self.batcher)
            .execute(change_set, policy, &call, cancellation)
            .await
    }

    pub async fn write(
        &self,
        change_set: &TupleChangeSet,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        self.execute_change_set(change_set, policy, WRITE_OPERATION)
            .await
            .into_result()
    }

    pub async fn write_tuples(
        &self,
        tuples: Vec<Tuple>,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        let change_set = self.checked(TupleChangeSet::writes_only(tuples), WRITE_OPERATION)?;
        self.write(&change_set, policy).await
    }

    pub async fn delete_tuples(
        &self,
        tuples: Vec<Tuple>,
        policy: Option<ConflictPolicy>,
    ) -> Result<TransactionSummary, TransactionFailure> {
        let change_set = self.checked(TupleChangeSet::deletes_only(tuples), DELETE_OPERATION)?;
        self.execute_change_set(&change_set, policy, DELETE_OPERATION)
            .await
            .into_result()
    }

    /// Sends one request outside any transaction and classifies a failure
    /// the same way transactions do.
    ///
    /// Store and model ids missing from `request.call` are filled from the
    /// configuration.
    pub async fn send(
        &self,
        operation_name: &str,
        mut request: ApiRequest,
    ) -> Result<ApiResponse, ClassifiedError> {
        let defaults = self.call_metadata(operation_name);
        request.call.operation_name = defaults.operation_name;
        if request.call.store_id.is_none() {
            request.call.store_id = defaults.store_id;
        }
        if request.call.authorization_model_id.is_none() {
            request.call.authorization_model_id = defaults.authorization_model_id;
        }
        let call = request.call.clone();

        debug!(
            operation = %call.operation_name,
            method = %request.method,
            path = %request.path,
            "sending request"
        );
        match self.transport.invoke(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(classify_call(
                Some(response.status),
                &response.body,
                Some(&response.headers),
                &call,
            )),
            Err(err) => Err(ClassifiedError::transport(err.to_string(), &call)),
        }
    }

    fn checked(
        &self,
        change_set: rsfga_client_domain::DomainResult<TupleChangeSet>,
        operation_name: &str,
    ) -> Result<TupleChangeSet, TransactionFailure> {
        change_set.map_err(|err| {
            let call = self.call_metadata(operation_name);
            TransactionFailure::new(ClassifiedError::invalid_input(err.to_string(), &call), 0)
        })
    }
}
