//! Domain error types for change set construction and batching.

use thiserror::Error;

use crate::model::ChangeSide;

/// Client-side precondition failures detected before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A tuple has an empty or malformed field.
    #[error("invalid {side} tuple at index {index}: {message}")]
    InvalidTuple {
        side: ChangeSide,
        index: usize,
        message: String,
    },

    /// The same tuple is both written and deleted in one change set.
    #[error(
        "tuple {tuple} appears in both writes (index {write_index}) and deletes (index {delete_index})"
    )]
    AmbiguousTuple {
        tuple: String,
        write_index: usize,
        delete_index: usize,
    },

    /// Chunk size limit of zero.
    #[error("max tuples per call must be greater than 0")]
    InvalidChunkSize,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
