//! rsfga-client-transport: Transport abstraction layer
//!
//! This crate provides the transport abstraction for the rsfga client:
//! - `Transport` / `BlockingTransport` traits for executing one request
//! - Request, response and write-payload shapes
//! - Retry wrapper driven by the shared retryability rule
//! - In-memory implementation of the write endpoint for testing
//! - HTTP implementation using reqwest
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          rsfga-client-transport              │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs  - Transport trait definitions   │
//! │  request.rs - Request/response shapes       │
//! │  wire.rs    - Write request payload         │
//! │  retry.rs   - Retrying wrapper              │
//! │  memory.rs  - In-memory implementation      │
//! │  http.rs    - HTTP implementation           │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod http;
pub mod memory;
pub mod request;
pub mod retry;
pub mod traits;
pub mod wire;

// Re-export commonly used types
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use memory::MemoryTransport;
pub use request::{ApiRequest, ApiResponse, Method};
pub use retry::{RetryPolicy, RetryTransport};
pub use traits::{BlockingAdapter, BlockingTransport, Transport};
pub use wire::{DeleteSection, WriteRequestBody, WriteSection};
