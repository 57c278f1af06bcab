//! In-memory OpenFGA write service.
//!
//! Speaks the same wire format as a real server for `POST /stores/{id}/write`
//! and enforces conflict directives per section. A request is applied
//! atomically: either every write and delete takes effect or none does.
//!
//! Status mapping:
//!
//! | Situation                                   | Status | Code                                            |
//! |---------------------------------------------|--------|-------------------------------------------------|
//! | Unknown store                               | 404    | `store_id_not_found`                            |
//! | Unparseable or empty body                   | 400    | `invalid_write_input`                           |
//! | Too many tuples                             | 400    | `validation_error`                              |
//! | Same key twice in one request               | 400    | `cannot_allow_duplicate_tuples_in_one_request`  |
//! | Duplicate write, `on_duplicate: error`      | 409    | `write_failed_due_to_invalid_input`             |
//! | Existing tuple with a different condition   | 409    | `write_failed_due_to_invalid_input`             |
//! | Missing delete, `on_missing: error`         | 404    | `write_failed_due_to_invalid_input`             |

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rsfga_client_domain::{
    header_names, OnDuplicateWrite, OnMissingDelete, Tuple, TupleCondition, TupleKey,
};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::TransportResult;
use crate::request::{ApiRequest, ApiResponse, Method};
use crate::traits::Transport;
use crate::wire::WriteRequestBody;

/// Server-side limit on tuples per write request.
pub const DEFAULT_MAX_TUPLES_PER_WRITE: usize = 100;

mod codes {
    pub const STORE_ID_NOT_FOUND: &str = "store_id_not_found";
    pub const UNDEFINED_ENDPOINT: &str = "undefined_endpoint";
    pub const INVALID_WRITE_INPUT: &str = "invalid_write_input";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const DUPLICATE_IN_REQUEST: &str = "cannot_allow_duplicate_tuples_in_one_request";
    pub const WRITE_FAILED: &str = "write_failed_due_to_invalid_input";
}

type StoredTuples = HashMap<TupleKey, Option<TupleCondition>>;

/// Thread-safe in-memory service implementing [`Transport`].
#[derive(Debug)]
pub struct MemoryTransport {
    stores: DashMap<String, StoredTuples>,
    max_tuples_per_write: usize,
    calls: AtomicUsize,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self {
            stores: DashMap::new(),
            max_tuples_per_write: DEFAULT_MAX_TUPLES_PER_WRITE,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Creates the transport with one empty store.
    pub fn with_store(store_id: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.create_store(store_id);
        transport
    }

    /// Overrides the per-request tuple limit.
    pub fn with_max_tuples_per_write(mut self, max: usize) -> Self {
        self.max_tuples_per_write = max;
        self
    }

    /// Creates an empty store; existing stores are left untouched.
    pub fn create_store(&self, store_id: impl Into<String>) {
        self.stores.entry(store_id.into()).or_default();
    }

    /// Stores a tuple directly, bypassing the write endpoint.
    pub fn seed(&self, store_id: &str, tuple: Tuple) {
        let mut store = self.stores.entry(store_id.to_string()).or_default();
        store.insert(tuple.key(), tuple.condition);
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns true if the store holds a tuple with this key.
    pub fn contains(&self, store_id: &str, key: &TupleKey) -> bool {
        self.stores
            .get(store_id)
            .is_some_and(|store| store.contains_key(key))
    }

    /// Snapshot of the tuples in a store, sorted by key for stable assertions.
    pub fn tuples(&self, store_id: &str) -> Vec<Tuple> {
        let Some(store) = self.stores.get(store_id) else {
            return Vec::new();
        };
        let mut tuples: Vec<Tuple> = store
            .iter()
            .map(|(key, condition)| Tuple {
                user: key.user.clone(),
                relation: key.relation.clone(),
                object: key.object.clone(),
                condition: condition.clone(),
            })
            .collect();
        tuples.sort_by(|a, b| {
            (&a.object, &a.relation, &a.user).cmp(&(&b.object, &b.relation, &b.user))
        });
        tuples
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let store_id = match (request.method, write_store_id(&request.path)) {
            (Method::Post, Some(store_id)) => store_id,
            _ => {
                return error_response(
                    404,
                    codes::UNDEFINED_ENDPOINT,
                    format!("no route for {} {}", request.method, request.path),
                )
            }
        };

        let body: WriteRequestBody = match request
            .body
            .clone()
            .map(serde_json::from_value::<WriteRequestBody>)
            .transpose()
        {
            Ok(Some(body)) => body,
            Ok(None) => {
                return error_response(400, codes::INVALID_WRITE_INPUT, "request body is required")
            }
            Err(err) => return error_response(400, codes::INVALID_WRITE_INPUT, err.to_string()),
        };

        let response = match self.apply(store_id, &body) {
            Ok(()) => ApiResponse::new(200, json!({})),
            Err(response) => response,
        };
        let response = response
            .with_header(header_names::REQUEST_ID[0], uuid::Uuid::new_v4().to_string())
            .with_header(header_names::STORE_ID[0], store_id);
        match body.authorization_model_id {
            Some(model_id) => {
                response.with_header(header_names::AUTHORIZATION_MODEL_ID[0], model_id)
            }
            None => response,
        }
    }

    fn apply(&self, store_id: &str, body: &WriteRequestBody) -> Result<(), ApiResponse> {
        let total = body.tuple_count();
        if total == 0 {
            return Err(error_response(
                400,
                codes::INVALID_WRITE_INPUT,
                "invalid WriteRequest: must contain at least one write or delete",
            ));
        }
        if total > self.max_tuples_per_write {
            return Err(error_response(
                400,
                codes::VALIDATION_ERROR,
                format!(
                    "the number of tuples per write request ({total}) exceeds the allowed limit of {}",
                    self.max_tuples_per_write
                ),
            ));
        }

        let writes = body.writes.as_ref().map_or(&[][..], |w| &w.tuple_keys[..]);
        let deletes = body.deletes.as_ref().map_or(&[][..], |d| &d.tuple_keys[..]);
        let on_duplicate = body.writes.as_ref().map(|w| w.on_duplicate).unwrap_or_default();
        let on_missing = body.deletes.as_ref().map(|d| d.on_missing).unwrap_or_default();

        let mut seen = HashSet::with_capacity(total);
        for key in writes.iter().map(Tuple::key).chain(deletes.iter().cloned()) {
            if !seen.insert(key.clone()) {
                return Err(error_response(
                    400,
                    codes::DUPLICATE_IN_REQUEST,
                    format!("duplicate tuple in write request: '{key}'"),
                ));
            }
        }

        let Some(mut store) = self.stores.get_mut(store_id) else {
            return Err(error_response(
                404,
                codes::STORE_ID_NOT_FOUND,
                format!("store '{store_id}' not found"),
            ));
        };

        // Validate the whole request before touching state.
        let mut to_insert = Vec::with_capacity(writes.len());
        for tuple in writes {
            let key = tuple.key();
            match store.get(&key) {
                None => to_insert.push((key, tuple.condition.clone())),
                Some(existing) if *existing != tuple.condition => {
                    return Err(error_response(
                        409,
                        codes::WRITE_FAILED,
                        format!(
                            "cannot write a tuple which already exists with a different condition: '{key}'"
                        ),
                    ));
                }
                Some(_) if on_duplicate == OnDuplicateWrite::Error => {
                    return Err(error_response(
                        409,
                        codes::WRITE_FAILED,
                        format!("cannot write a tuple which already exists: '{key}'"),
                    ));
                }
                Some(_) => debug!(tuple = %key, "ignoring duplicate write"),
            }
        }

        let mut to_remove = Vec::with_capacity(deletes.len());
        for key in deletes {
            if store.contains_key(key) {
                to_remove.push(key);
            } else if on_missing == OnMissingDelete::Error {
                return Err(error_response(
                    404,
                    codes::WRITE_FAILED,
                    format!("cannot delete a tuple which does not exist: '{key}'"),
                ));
            } else {
                debug!(tuple = %key, "ignoring missing delete");
            }
        }

        for key in to_remove {
            store.remove(key);
        }
        for (key, condition) in to_insert {
            store.insert(key, condition);
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    #[instrument(
        skip(self, request),
        fields(operation = %request.call.operation_name, path = %request.path)
    )]
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.handle(&request))
    }
}

fn write_store_id(path: &str) -> Option<&str> {
    path.strip_prefix("/stores/")?
        .strip_suffix("/write")
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

fn error_response(status: u16, code: &str, message: impl Into<String>) -> ApiResponse {
    ApiResponse::new(status, json!({ "code": code, "message": Value::String(message.into()) }))
}
