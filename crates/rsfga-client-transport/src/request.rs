//! Request and response shapes exchanged with a transport.

use std::fmt;

use rsfga_client_domain::{CallMetadata, ResponseHeaders};
use serde_json::Value;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single remote call.
///
/// `call` carries the operation tag and call-site identifiers through the
/// transport boundary so they are available whatever the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. "/stores/01H.../write".
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub call: CallMetadata,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, call: CallMetadata) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            call,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn operation_name(&self) -> &str {
        &self.call.operation_name
    }
}

/// The raw outcome of a call that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when empty, a string when not JSON.
    pub body: Value,
    pub headers: ResponseHeaders,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            headers: ResponseHeaders::new(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
