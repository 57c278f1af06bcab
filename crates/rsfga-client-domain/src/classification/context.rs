//! Operation metadata and the exception context built from it.

use super::headers::{header_names, ResponseHeaders};

/// Call-site metadata attached to a request before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    /// Semantic label of the attempted action, e.g. "write", "delete", "check".
    pub operation_name: String,
    /// Store the caller targeted, if known at the call site.
    pub store_id: Option<String>,
    /// Authorization model the caller pinned, if any.
    pub authorization_model_id: Option<String>,
}

impl CallMetadata {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            store_id: None,
            authorization_model_id: None,
        }
    }

    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    pub fn with_authorization_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.authorization_model_id = Some(model_id.into());
        self
    }
}

/// Identifying metadata of a failed call.
///
/// Every field is optional: a connection failure has no request id, and a
/// standalone classification may not know the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionContext {
    pub operation_name: Option<String>,
    pub request_id: Option<String>,
    pub store_id: Option<String>,
    pub authorization_model_id: Option<String>,
}

impl ExceptionContext {
    /// Builds the context for a call from its metadata and, when a response
    /// arrived, its headers.
    ///
    /// Header values win over call-site values. The request id only ever comes
    /// from headers. Missing values leave the field unset.
    pub fn capture(call: &CallMetadata, headers: Option<&ResponseHeaders>) -> Self {
        let from_headers = |names: &[&str]| {
            headers
                .and_then(|h| h.first_of(names))
                .map(str::to_string)
        };

        Self {
            operation_name: non_empty(&call.operation_name),
            request_id: from_headers(header_names::REQUEST_ID),
            store_id: from_headers(header_names::STORE_ID)
                .or_else(|| call.store_id.as_deref().and_then(non_empty)),
            authorization_model_id: from_headers(header_names::AUTHORIZATION_MODEL_ID).or_else(
                || call.authorization_model_id.as_deref().and_then(non_empty),
            ),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
