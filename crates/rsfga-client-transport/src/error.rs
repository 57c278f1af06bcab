//! Transport error types.

use thiserror::Error;

/// Failures that prevented a request from producing a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established or was lost.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// The request did not complete in time.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The request could not be built (bad URL, header, or body).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The response could not be read.
    #[error("failed to read response: {message}")]
    ResponseRead { message: String },

    /// Internal transport error.
    #[error("internal transport error: {message}")]
    Internal { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout { message }
        } else if err.is_builder() {
            TransportError::InvalidRequest { message }
        } else if err.is_body() || err.is_decode() {
            TransportError::ResponseRead { message }
        } else {
            TransportError::Connection { message }
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
