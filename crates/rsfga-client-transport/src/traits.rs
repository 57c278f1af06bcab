//! Transport trait definitions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::request::{ApiRequest, ApiResponse};

/// Executes one request against the remote service.
///
/// A response with any status is `Ok`; `Err` means no response was obtained.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        (**self).invoke(request).await
    }
}

/// Blocking flavor of [`Transport`], with identical semantics.
pub trait BlockingTransport: Send + Sync {
    fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse>;
}

/// Exposes a [`BlockingTransport`] through the async [`Transport`] trait.
///
/// The call runs inline on the polling thread, so the executor sees the
/// same single in-flight call it sees with an async transport.
#[derive(Debug, Clone)]
pub struct BlockingAdapter<T> {
    inner: T,
}

impl<T: BlockingTransport> BlockingAdapter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: BlockingTransport> Transport for BlockingAdapter<T> {
    async fn invoke(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        BlockingTransport::invoke(&self.inner, request)
    }
}
