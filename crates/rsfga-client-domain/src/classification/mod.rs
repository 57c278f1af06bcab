//! Classification of failed remote calls.
//!
//! Every failed call, whether it reached the service or not, is turned into a
//! [`ClassifiedError`]: an [`ErrorKind`] derived from the status code, the
//! diagnostic fields reported by the service, and an [`ExceptionContext`]
//! identifying the operation, request, store and model.
//!
//! # Classification Rules
//!
//! | Condition | Kind |
//! |---|---|
//! | 401 | `Authentication` |
//! | 403 | `Authorization` |
//! | 404 | `NotFound` |
//! | 429 | `RateLimit` |
//! | other 4xx | `Validation` |
//! | 5xx | `Server` |
//! | no response | `Transport` |
//!
//! Cancellation is never derived from a response; it is produced by the
//! executor when the caller cancels a transaction.

mod classified;
mod context;
mod headers;
mod kind;

#[cfg(test)]
mod classification_proptest;

pub use classified::{classify, classify_call, ClassifiedError, INVALID_INPUT_CODE};
pub use context::{CallMetadata, ExceptionContext};
pub use headers::{header_names, ResponseHeaders};
pub use kind::ErrorKind;
