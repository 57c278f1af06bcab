//! Conflict policies for duplicate writes and missing deletes.
//!
//! The two settings are independent. They are sent to the service with every
//! chunk as separate directives (`on_duplicate` on the writes, `on_missing` on
//! the deletes), so the service enforces them in the same call.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavior when a write targets a tuple that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDuplicateWrite {
    /// Fail the call (the service default).
    #[default]
    Error,
    /// Treat the write as a no-op.
    Ignore,
}

impl OnDuplicateWrite {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OnDuplicateWrite::Error => "error",
            OnDuplicateWrite::Ignore => "ignore",
        }
    }
}

impl fmt::Display for OnDuplicateWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior when a delete targets a tuple that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissingDelete {
    /// Fail the call (the service default).
    #[default]
    Error,
    /// Treat the delete as a no-op.
    Ignore,
}

impl OnMissingDelete {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OnMissingDelete::Error => "error",
            OnMissingDelete::Ignore => "ignore",
        }
    }
}

impl fmt::Display for OnMissingDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call conflict policy. Both fields default to `Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConflictPolicy {
    #[serde(default)]
    pub on_duplicate_write: OnDuplicateWrite,
    #[serde(default)]
    pub on_missing_delete: OnMissingDelete,
}

impl ConflictPolicy {
    /// Both conflicts fail the call.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Both conflicts are no-ops, making the change set safe to replay.
    pub fn idempotent() -> Self {
        Self {
            on_duplicate_write: OnDuplicateWrite::Ignore,
            on_missing_delete: OnMissingDelete::Ignore,
        }
    }

    pub fn with_on_duplicate_write(mut self, behavior: OnDuplicateWrite) -> Self {
        self.on_duplicate_write = behavior;
        self
    }

    pub fn with_on_missing_delete(mut self, behavior: OnMissingDelete) -> Self {
        self.on_missing_delete = behavior;
        self
    }
}
