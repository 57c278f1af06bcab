//! rsfga-client: Conflict-policy-aware write transactions for OpenFGA
//!
//! This crate ties the domain logic and the transport layer together:
//! - `TransactionExecutor` - ordered, chunked execution of a change set
//! - `Client` / `BlockingClient` - async and blocking entry points
//! - `ClientConfig` - layered configuration (defaults, YAML, environment)
//! - `observability` - logging setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 rsfga-client                 │
//! ├─────────────────────────────────────────────┤
//! │  client.rs   / blocking.rs                  │
//! │        │                                    │
//! │        ▼                                    │
//! │  executor.rs ──► Batcher (domain)           │
//! │        │     ──► classify (domain)          │
//! │        ▼                                    │
//! │  Transport (rsfga-client-transport)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rsfga_client::{Client, ClientConfig, ConflictPolicy, Tuple};
//!
//! let client = Client::from_config(ClientConfig::from_env()?)?;
//! client
//!     .write_tuples(
//!         vec![Tuple::new("user:anne", "viewer", "document:roadmap")],
//!         Some(ConflictPolicy::idempotent()),
//!     )
//!     .await?;
//! ```

pub mod blocking;
pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod observability;

pub use blocking::BlockingClient;
pub use cancel::CancellationToken;
pub use client::{Client, HttpStack, DELETE_OPERATION, WRITE_OPERATION};
pub use config::{ClientConfig, ConfigLoadError, LogFormat};
pub use error::{ClientError, ClientResult};
pub use executor::{TransactionExecutor, TransactionFailure, TransactionOutcome, TransactionSummary};

pub use rsfga_client_domain::{
    classify, classify_call, CallMetadata, ClassifiedError, ConflictPolicy, ErrorKind,
    ExceptionContext, OnDuplicateWrite, OnMissingDelete, ResponseHeaders, Tuple, TupleChangeSet,
    TupleCondition, TupleKey,
};
pub use rsfga_client_transport::{
    ApiRequest, ApiResponse, BlockingTransport, MemoryTransport, Method, Transport,
    TransportError,
};
