//! Streaming response support for API providers

use super::{ApiError, ApiProvider, CompletionRequest};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

/// Raw response body as it arrives from the transport.
/// Dropping the stream releases the underlying connection.
pub type ByteStream = BoxStream<'static, Result<Bytes, ApiError>>;

/// Trait for providers that support streaming responses
#[async_trait]
pub trait StreamingProvider: ApiProvider {
    /// Send a request and return the response body once the status is known
    /// to be successful. Non-success statuses are reported as errors here,
    /// before any body bytes are read.
    async fn send_streaming(&self, request: CompletionRequest) -> Result<ByteStream, ApiError>;
}
