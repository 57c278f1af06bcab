//! Write request payload in the OpenFGA wire format.
//!
//! ```json
//! {
//!   "writes":  { "tuple_keys": [...], "on_duplicate": "ignore" },
//!   "deletes": { "tuple_keys": [...], "on_missing": "error" },
//!   "authorization_model_id": "01H..."
//! }
//! ```
//!
//! Each section carries its own conflict directive; a section is omitted when
//! it has no tuples.

use rsfga_client_domain::{
    Chunk, ConflictPolicy, OnDuplicateWrite, OnMissingDelete, Tuple, TupleKey,
};
use serde::{Deserialize, Serialize};

/// Path of the write endpoint for a store.
pub fn write_path(store_id: &str) -> String {
    format!("/stores/{store_id}/write")
}

/// Writes of one request and the duplicate-write directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSection {
    pub tuple_keys: Vec<Tuple>,
    #[serde(default)]
    pub on_duplicate: OnDuplicateWrite,
}

/// Deletes of one request and the missing-delete directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSection {
    pub tuple_keys: Vec<TupleKey>,
    #[serde(default)]
    pub on_missing: OnMissingDelete,
}

/// Body of `POST /stores/{store_id}/write`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writes: Option<WriteSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletes: Option<DeleteSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_model_id: Option<String>,
}

impl WriteRequestBody {
    /// Builds the payload for one chunk under the given policy.
    pub fn for_chunk(
        chunk: &Chunk<'_>,
        policy: ConflictPolicy,
        authorization_model_id: Option<&str>,
    ) -> Self {
        let writes = (!chunk.writes().is_empty()).then(|| WriteSection {
            tuple_keys: chunk.writes().to_vec(),
            on_duplicate: policy.on_duplicate_write,
        });
        let deletes = (!chunk.deletes().is_empty()).then(|| DeleteSection {
            tuple_keys: chunk.deletes().iter().map(Tuple::key).collect(),
            on_missing: policy.on_missing_delete,
        });

        Self {
            writes,
            deletes,
            authorization_model_id: authorization_model_id.map(str::to_string),
        }
    }

    /// Number of tuples in the payload.
    pub fn tuple_count(&self) -> usize {
        self.writes.as_ref().map_or(0, |w| w.tuple_keys.len())
            + self.deletes.as_ref().map_or(0, |d| d.tuple_keys.len())
    }

    /// True when sending the payload a second time after it was applied
    /// succeeds again, i.e. no section asks the service to reject conflicts.
    pub fn is_replay_safe(&self) -> bool {
        let writes = self
            .writes
            .as_ref()
            .map_or(true, |w| w.on_duplicate == OnDuplicateWrite::Ignore);
        let deletes = self
            .deletes
            .as_ref()
            .map_or(true, |d| d.on_missing == OnMissingDelete::Ignore);
        writes && deletes
    }
}
