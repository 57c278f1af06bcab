//! Shared test utilities for rsfga-client integration tests.

// Each test file uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rsfga_client::{
    ApiRequest, ApiResponse, BlockingTransport, ClientConfig, Transport, TransportError, Tuple,
};
use rsfga_client_transport::{TransportResult, WriteRequestBody};
use serde_json::{json, Value};

pub const STORE_ID: &str = "01HVMMBCMGZNT3SED4Z17ECXCA";
pub const MODEL_ID: &str = "01HVMMBD123456789ABCDEFGHJ";
pub const REQUEST_ID: &str = "req-5b1f7a";

/// Config targeting [`STORE_ID`] with the given chunk limit.
pub fn config(max_tuples_per_call: usize) -> ClientConfig {
    let mut config = ClientConfig::for_store(STORE_ID);
    config.write.max_tuples_per_call = max_tuples_per_call;
    config
}

/// `n` distinct viewer tuples on one document, users numbered from `start`.
pub fn viewers(start: usize, n: usize) -> Vec<Tuple> {
    (start..start + n)
        .map(|i| Tuple::new(format!("user:{i}"), "viewer", "document:roadmap"))
        .collect()
}

pub fn anne() -> Tuple {
    Tuple::new("user:anne", "viewer", "document:x")
}

pub fn bob() -> Tuple {
    Tuple::new("user:bob", "editor", "document:y")
}

pub fn ok() -> ApiResponse {
    ApiResponse::new(200, json!({}))
}

/// An OpenFGA error response carrying the usual context headers.
pub fn failed(status: u16, code: &str, message: &str) -> ApiResponse {
    ApiResponse::new(status, json!({ "code": code, "message": message }))
        .with_header("fga-request-id", REQUEST_ID)
        .with_header("store_id", STORE_ID)
        .with_header("openfga_authorization_model_id", MODEL_ID)
}

/// Transport double replying from a queue and recording every request.
///
/// Implements both the async and the blocking transport traits; clones share
/// the same script and log. An exhausted script answers 200.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<TransportResult<ApiResponse>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = TransportResult<ApiResponse>>) -> Self {
        let transport = Self::new();
        transport.replies.lock().unwrap().extend(replies);
        transport
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Request bodies decoded as write payloads.
    pub fn write_bodies(&self) -> Vec<WriteRequestBody> {
        self.requests()
            .into_iter()
            .map(|request| serde_json::from_value(request.body.unwrap_or(Value::Null)).unwrap())
            .collect()
    }

    fn reply(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ok()))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        self.reply(request)
    }
}

impl BlockingTransport for ScriptedTransport {
    fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        self.reply(request)
    }
}

pub fn connection_refused() -> TransportError {
    TransportError::Connection {
        message: "connection refused".to_string(),
    }
}
