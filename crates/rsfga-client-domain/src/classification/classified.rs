//! The classified error returned for every failed call.

use std::fmt;

use serde_json::Value;

use super::context::{CallMetadata, ExceptionContext};
use super::headers::ResponseHeaders;
use super::kind::ErrorKind;

/// Error code of inputs rejected on the client side.
pub const INVALID_INPUT_CODE: &str = "invalid_change_set";

/// A failed remote call, classified and tagged with its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    kind: ErrorKind,
    status: Option<u16>,
    code: Option<String>,
    message: Option<String>,
    context: ExceptionContext,
}

impl ClassifiedError {
    /// A call that never produced a response.
    pub fn transport(message: impl Into<String>, call: &CallMetadata) -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            code: None,
            message: Some(message.into()),
            context: ExceptionContext::capture(call, None),
        }
    }

    /// Input rejected before any call was made.
    pub fn invalid_input(message: impl Into<String>, call: &CallMetadata) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status: None,
            code: Some(INVALID_INPUT_CODE.to_string()),
            message: Some(message.into()),
            context: ExceptionContext::capture(call, None),
        }
    }

    /// A transaction stopped because the caller cancelled it.
    pub fn cancelled(call: &CallMetadata) -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            status: None,
            code: None,
            message: Some("operation cancelled by caller".to_string()),
            context: ExceptionContext::capture(call, None),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, absent when no response arrived.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Error code reported by the service, e.g. "validation_error".
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Human readable message reported by the service or the transport.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn context(&self) -> &ExceptionContext {
        &self.context
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.context.operation_name.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.context.request_id.as_deref()
    }

    pub fn store_id(&self) -> Option<&str> {
        self.context.store_id.as_deref()
    }

    pub fn authorization_model_id(&self) -> Option<&str> {
        self.context.authorization_model_id.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_not_found_error(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_authentication_error(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }

    pub fn is_authorization_error(&self) -> bool {
        self.kind == ErrorKind::Authorization
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.kind == ErrorKind::RateLimit
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == ErrorKind::Server
    }

    pub fn is_transport_error(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::with_capacity(8);
        if let Some(operation) = self.operation_name() {
            lines.push(format!("Operation: {operation}"));
        }
        if let Some(status) = self.status {
            lines.push(format!("Status: {status}"));
        }
        if let Some(code) = self.code() {
            lines.push(format!("Error Code: {code}"));
        }
        if let Some(message) = self.message() {
            lines.push(format!("Message: {message}"));
        }
        if let Some(request_id) = self.request_id() {
            lines.push(format!("Request ID: {request_id}"));
        }
        if let Some(store_id) = self.store_id() {
            lines.push(format!("Store ID: {store_id}"));
        }
        if let Some(model_id) = self.authorization_model_id() {
            lines.push(format!("Authorization Model ID: {model_id}"));
        }
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for ClassifiedError {}

/// Classifies a failed call using only its operation name as call-site metadata.
///
/// Usable outside transactions, e.g. for read-path calls.
pub fn classify(
    status: Option<u16>,
    body: &Value,
    headers: &ResponseHeaders,
    operation_name: &str,
) -> ClassifiedError {
    classify_call(status, body, Some(headers), &CallMetadata::new(operation_name))
}

/// Classifies a failed call.
///
/// The kind depends on the status only; `code` and `message` are copied from
/// an OpenFGA error body (`{"code": ..., "message": ...}`) or, for a plain
/// string body, the string becomes the message.
pub fn classify_call(
    status: Option<u16>,
    body: &Value,
    headers: Option<&ResponseHeaders>,
    call: &CallMetadata,
) -> ClassifiedError {
    let (code, message) = error_fields(body);
    ClassifiedError {
        kind: ErrorKind::from_status(status),
        status,
        code,
        message,
        context: ExceptionContext::capture(call, headers),
    }
}

fn error_fields(body: &Value) -> (Option<String>, Option<String>) {
    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    match body {
        Value::Object(fields) => (text(fields.get("code")), text(fields.get("message"))),
        Value::String(raw) if !raw.is_empty() => (None, Some(raw.clone())),
        _ => (None, None),
    }
}
