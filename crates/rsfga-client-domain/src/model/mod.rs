//! Tuple model, change sets and conflict policies.
//!
//! This module contains:
//! - Core tuple types (Tuple, TupleKey, TupleCondition)
//! - The validated write/delete change set
//! - The per-call conflict policy

mod change_set;
mod policy;
mod types;

pub use change_set::{ChangeSide, TupleChangeSet};
pub use policy::{ConflictPolicy, OnDuplicateWrite, OnMissingDelete};
pub use types::*;
