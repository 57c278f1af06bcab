//! Client error types.

use rsfga_client_domain::DomainError;
use rsfga_client_transport::TransportError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Failures while building a client or its inputs.
///
/// Failures of remote calls are reported as
/// [`TransactionFailure`](crate::TransactionFailure) instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The change set or batch limit was rejected before any call.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    /// The transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// The blocking client's runtime could not be started.
    #[error("failed to start runtime: {message}")]
    Runtime { message: String },
}

/// Result type for client construction.
pub type ClientResult<T> = Result<T, ClientError>;
