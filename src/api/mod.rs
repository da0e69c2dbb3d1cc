//! Completion API access: request building, transport and SSE decoding

mod client;
mod decoder;
mod request;
mod sse;
mod streaming;

pub use client::ChefClient;
pub use decoder::{LineBuffer, Utf8Decoder};
pub use request::{ChatMessage, CompletionRequest, Role, TipsRequest};
pub use sse::{parse_sse_line, SseEvent};
pub use streaming::{ByteStream, StreamingProvider};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("No API key configured")]
    MissingCredential,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for non-streaming completion calls
#[async_trait]
pub trait ApiProvider: Send + Sync {
    /// Whether a credential is available; without one no request is attempted
    fn is_configured(&self) -> bool;

    /// Send a request and return the assistant message content
    async fn send_request(&self, request: CompletionRequest) -> Result<String, ApiError>;
}
