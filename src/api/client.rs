//! HTTP client for the OpenAI-compatible chat completion endpoint

use super::streaming::{ByteStream, StreamingProvider};
use super::{ApiError, ApiProvider, CompletionRequest};
use crate::config::ChefSettings;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Chat completion client (Groq by default)
pub struct ChefClient {
    settings: ChefSettings,
    client: Client,
}

impl ChefClient {
    pub fn new(settings: ChefSettings) -> Result<Self, ApiError> {
        // No overall timeout: it would also cut off long streamed bodies.
        // Waiting is bounded per phase by the tips reader instead.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        self.settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingCredential)
    }

    async fn post(&self, request: &CompletionRequest) -> Result<Response, ApiError> {
        let api_key = self.api_key()?;
        let body = request.to_body(&self.settings.model, self.settings.temperature);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::Provider(format!("{}: {}", status, error_text)))
        }
    }
}

#[async_trait]
impl ApiProvider for ChefClient {
    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn send_request(&self, request: CompletionRequest) -> Result<String, ApiError> {
        let response = self.post(&request).await?;
        let json: Value = response.json().await?;

        Ok(json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl StreamingProvider for ChefClient {
    async fn send_streaming(&self, request: CompletionRequest) -> Result<ByteStream, ApiError> {
        let response = self.post(&request).await?;
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ApiError::from));

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let settings = ChefSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..ChefSettings::default()
        };
        let client = ChefClient::new(settings).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_configured_only_with_key() {
        let client = ChefClient::new(ChefSettings::default()).unwrap();
        assert!(!client.is_configured());

        let client = ChefClient::new(ChefSettings {
            api_key: Some("gsk-test".to_string()),
            ..ChefSettings::default()
        })
        .unwrap();
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let client = ChefClient::new(ChefSettings::default()).unwrap();
        let request = CompletionRequest::streaming_tips(&crate::api::TipsRequest::new("pasta"), 300);
        assert!(matches!(
            client.send_streaming(request).await,
            Err(ApiError::MissingCredential)
        ));
    }
}
