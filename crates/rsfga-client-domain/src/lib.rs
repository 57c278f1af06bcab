//! rsfga-client-domain: Write-transaction domain logic for the rsfga client
//!
//! This crate contains the transport-independent parts of a write transaction:
//! - Tuple model, change sets and conflict policies
//! - Batching of change sets into server-sized chunks
//! - Classification of failed remote calls and their exception context
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            rsfga-client-domain               │
//! ├─────────────────────────────────────────────┤
//! │  model/          - Tuples, change sets,     │
//! │                    conflict policies        │
//! │  batch/          - Chunking                 │
//! │  classification/ - Error kinds & context    │
//! └─────────────────────────────────────────────┘
//! ```

pub mod batch;
pub mod classification;
pub mod error;
pub mod model;

// Re-export commonly used types at the crate root
pub use batch::{Batcher, Chunk};
pub use classification::{
    classify, classify_call, header_names, CallMetadata, ClassifiedError, ErrorKind,
    ExceptionContext, ResponseHeaders,
};
pub use error::{DomainError, DomainResult};
pub use model::{
    ChangeSide, ConflictPolicy, OnDuplicateWrite, OnMissingDelete, Tuple, TupleChangeSet,
    TupleCondition, TupleKey,
};
