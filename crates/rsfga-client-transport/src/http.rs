//! HTTP transport over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use rsfga_client_domain::ResponseHeaders;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{TransportError, TransportResult};
use crate::request::{ApiRequest, ApiResponse};
use crate::traits::Transport;

const USER_AGENT: &str = concat!("rsfga-client/", env!("CARGO_PKG_VERSION"));

/// Sends requests to an OpenFGA-compatible HTTP API.
///
/// The underlying `reqwest::Client` is reused across calls for connection
/// pooling; clone the transport rather than building a new one per call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    default_headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| TransportError::InvalidRequest {
            message: format!("invalid api url '{base_url}': {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidRequest {
                message: format!("unsupported scheme in api url '{base_url}'"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
        })
    }

    /// Adds a header sent with every request, e.g. `Authorization`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        skip(self, request),
        fields(
            operation = %request.call.operation_name,
            method = %request.method,
            path = %request.path
        )
    )]
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), self.url(&request.path));
        for (name, value) in self.default_headers.iter().chain(request.headers.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response.bytes().await?;
        debug!(status, bytes = bytes.len(), "received response");

        Ok(ApiResponse {
            status,
            body: parse_body(&bytes),
            headers,
        })
    }
}

/// Empty bodies become `Null`; bodies that are not JSON are kept as text.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
