//! Michelin-chef tips: live from the completion API, canned when it is not reachable
//!
//! Two entry points share the same fallback policy:
//! - [`ChefService::stream_tips`] returns a lazy [`TipStream`] of text fragments
//! - [`ChefService::chef_tips`] returns a structured [`ChefTips`] card
//!
//! Neither ever returns an error.

mod stream;

pub use stream::{ConnectFuture, StreamTimeouts, TipStream};

use crate::api::{
    ApiError, ApiProvider, ChefClient, CompletionRequest, StreamingProvider, TipsRequest,
};
use crate::config::{ChefSettings, Config};
use crate::fallback::{fallback_for, Difficulty, FallbackTips};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const DEFAULT_PAIRING: &str = "Your choice of wine";

/// Where a tip card came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipSource {
    Chef,
    Fallback,
}

/// Structured tips for one dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefTips {
    pub tips: Vec<String>,
    pub ingredients: Vec<String>,
    pub pairing: String,
    pub difficulty: Difficulty,
    pub source: TipSource,
}

impl ChefTips {
    /// Read the chef's JSON answer. Missing fields get defaults; anything
    /// that is not a JSON object yields None.
    pub fn parse(content: &str) -> Option<Self> {
        let json = parse_json_object(content)?;

        Some(Self {
            tips: string_list(&json["tips"]),
            ingredients: string_list(&json["ingredients"]),
            pairing: json["pairing"]
                .as_str()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(DEFAULT_PAIRING)
                .to_string(),
            difficulty: json["difficulty"]
                .as_str()
                .and_then(Difficulty::parse)
                .unwrap_or_default(),
            source: TipSource::Chef,
        })
    }
}

impl From<&FallbackTips> for ChefTips {
    fn from(fallback: &FallbackTips) -> Self {
        Self {
            tips: fallback.tips.iter().map(|t| t.to_string()).collect(),
            ingredients: fallback.ingredients.iter().map(|i| i.to_string()).collect(),
            pairing: fallback.pairing.to_string(),
            difficulty: fallback.difficulty,
            source: TipSource::Fallback,
        }
    }
}

/// Accept a bare object, or one surrounded by prose or a code fence
fn parse_json_object(content: &str) -> Option<Value> {
    let content = content.trim();
    if let Ok(json @ Value::Object(_)) = serde_json::from_str::<Value>(content) {
        return Some(json);
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(json @ Value::Object(_)) => Some(json),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Entry point for chef tips. Cheap to clone; clones share one client.
#[derive(Clone)]
pub struct ChefService {
    provider: Arc<dyn StreamingProvider>,
    settings: ChefSettings,
}

impl ChefService {
    pub fn new(provider: Arc<dyn StreamingProvider>, settings: ChefSettings) -> Self {
        Self { provider, settings }
    }

    /// Build the HTTP client from configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = ChefClient::new(config.chef.clone())?;
        Ok(Self::new(Arc::new(client), config.chef.clone()))
    }

    pub fn is_live(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn timeouts(&self) -> StreamTimeouts {
        StreamTimeouts {
            connect: Duration::from_secs(self.settings.connect_timeout_secs),
            chunk: Duration::from_secs(self.settings.chunk_timeout_secs),
        }
    }

    /// Stream tips for a dish. The request is only sent once the returned
    /// stream is first polled.
    pub fn stream_tips(&self, request: &TipsRequest) -> TipStream {
        let fallback = fallback_for(&request.dish_name);

        if !self.provider.is_configured() {
            debug!(
                "No API key configured, serving fallback tips for \"{}\"",
                request.dish_name
            );
            return TipStream::fallback(fallback);
        }

        let provider = Arc::clone(&self.provider);
        let completion = CompletionRequest::streaming_tips(request, self.settings.stream_max_tokens);
        let connect = async move { provider.send_streaming(completion).await }.boxed();

        TipStream::connect(connect, fallback, self.timeouts())
    }

    /// Fetch a structured tip card for a dish
    pub async fn chef_tips(&self, request: &TipsRequest) -> ChefTips {
        let fallback = ChefTips::from(fallback_for(&request.dish_name));

        if !self.provider.is_configured() {
            debug!(
                "No API key configured, serving fallback card for \"{}\"",
                request.dish_name
            );
            return fallback;
        }

        let completion = CompletionRequest::tip_card(request, self.settings.card_max_tokens);
        let limit = Duration::from_secs(self.settings.card_timeout_secs);

        let content = match timeout(limit, self.provider.send_request(completion)).await {
            Ok(Ok(content)) => content,
            Ok(Err(e)) => {
                warn!("Chef tips request failed, serving fallback card: {}", e);
                return fallback;
            }
            Err(_) => {
                warn!(
                    "Chef tips request failed, serving fallback card: {}",
                    ApiError::Timeout("tip card")
                );
                return fallback;
            }
        };

        if content.trim().is_empty() {
            warn!("Chef returned an empty answer, serving fallback card");
            return fallback;
        }

        ChefTips::parse(&content).unwrap_or_else(|| {
            warn!("Chef answer was not a JSON tip card, serving fallback card");
            fallback
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ByteStream;
    use crate::fallback::TipCategory;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::{stream, StreamExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted transport
    #[derive(Default)]
    struct MockProvider {
        configured: bool,
        body: Mutex<Option<Result<Vec<Result<Bytes, ApiError>>, ApiError>>>,
        card: Mutex<Option<Result<String, ApiError>>>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl MockProvider {
        fn offline() -> Self {
            Self::default()
        }

        fn streaming(body: Vec<Result<Bytes, ApiError>>) -> Self {
            Self {
                configured: true,
                body: Mutex::new(Some(Ok(body))),
                ..Self::default()
            }
        }

        fn failing(error: ApiError) -> Self {
            Self {
                configured: true,
                body: Mutex::new(Some(Err(error))),
                ..Self::default()
            }
        }

        fn card(answer: Result<String, ApiError>) -> Self {
            Self {
                configured: true,
                card: Mutex::new(Some(answer)),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ApiProvider for MockProvider {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn send_request(&self, request: CompletionRequest) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.card
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(ApiError::Provider("no scripted card".into())))
        }
    }

    #[async_trait]
    impl StreamingProvider for MockProvider {
        async fn send_streaming(&self, request: CompletionRequest) -> Result<ByteStream, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            let body = self
                .body
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(ApiError::Provider("no scripted body".into())))?;
            Ok(stream::iter(body).boxed())
        }
    }

    fn service(provider: MockProvider) -> (ChefService, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let settings = ChefSettings {
            connect_timeout_secs: 2,
            chunk_timeout_secs: 2,
            card_timeout_secs: 2,
            ..ChefSettings::default()
        };
        (ChefService::new(provider.clone(), settings), provider)
    }

    fn delta(content: &str) -> Result<Bytes, ApiError> {
        Ok(Bytes::from(format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )))
    }

    async fn collect(tips: TipStream) -> Vec<String> {
        tips.into_stream().collect().await
    }

    fn canned(category: TipCategory) -> Vec<String> {
        category.tips().tips.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_pasta_without_credential() {
        let (chef, provider) = service(MockProvider::offline());
        for name in ["Pasta Carbonara", "creamy PASTA bake", "pasta"] {
            let tips = collect(chef.stream_tips(&TipsRequest::new(name))).await;
            assert_eq!(tips, canned(TipCategory::Pasta));
            assert_eq!(tips.len(), 4);
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_dish_without_credential() {
        let (chef, _) = service(MockProvider::offline());
        let tips = collect(chef.stream_tips(&TipsRequest::new("Zzzznorp"))).await;
        assert_eq!(tips, canned(TipCategory::Default));
    }

    #[tokio::test]
    async fn test_live_stream() {
        let (chef, provider) = service(MockProvider::streaming(vec![
            delta("1. Toast "),
            delta("the spices."),
            Ok(Bytes::from_static(b"data: [DONE]\n\n")),
        ]));
        let request = TipsRequest::new("Chana Masala").with_cuisine("Indian");

        let mut tips = chef.stream_tips(&request);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        assert_eq!(tips.next_delta().await.as_deref(), Some("1. Toast "));
        assert_eq!(tips.next_delta().await.as_deref(), Some("the spices."));
        assert_eq!(tips.next_delta().await, None);
        assert!(!tips.used_fallback());

        let sent = provider.last_request.lock().unwrap().clone().unwrap();
        assert!(sent.stream);
        assert_eq!(sent.max_tokens, 300);
        assert_eq!(sent.messages[1].content, request.prompt());
    }

    #[tokio::test]
    async fn test_initiation_failure_falls_back() {
        let (chef, provider) = service(MockProvider::failing(ApiError::Provider(
            "401 Unauthorized: invalid api key".into(),
        )));
        let mut tips = chef.stream_tips(&TipsRequest::new("Grilled Fish"));

        let mut collected = Vec::new();
        while let Some(delta) = tips.next_delta().await {
            collected.push(delta);
        }
        assert_eq!(collected, canned(TipCategory::Fish));
        assert!(tips.used_fallback());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_appends_fallback() {
        let (chef, _) = service(MockProvider::streaming(vec![
            delta("Pat the steak dry."),
            Err(ApiError::Provider("connection reset by peer".into())),
        ]));
        let tips = collect(chef.stream_tips(&TipsRequest::new("Beef Tenderloin"))).await;

        let mut expected = vec!["Pat the steak dry.".to_string()];
        expected.extend(canned(TipCategory::Beef));
        assert_eq!(tips, expected);
    }

    #[tokio::test]
    async fn test_streams_are_independent() {
        let (chef, _) = service(MockProvider::offline());
        let a = chef.stream_tips(&TipsRequest::new("chicken curry"));
        let b = chef.clone().stream_tips(&TipsRequest::new("fish pie"));

        let (a, b) = tokio::join!(collect(a), collect(b));
        assert_eq!(a, canned(TipCategory::Chicken));
        assert_eq!(b, canned(TipCategory::Fish));
    }

    #[tokio::test]
    async fn test_card_without_credential() {
        let (chef, provider) = service(MockProvider::offline());
        let card = chef.chef_tips(&TipsRequest::new("Chicken Tikka")).await;

        assert_eq!(card.source, TipSource::Fallback);
        assert_eq!(card.tips, canned(TipCategory::Chicken));
        assert_eq!(card.difficulty, Difficulty::Easy);
        assert_eq!(card.ingredients.len(), 5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_card_from_chef() {
        let answer = r#"{"tips":["Rinse the rice","Cool it to body temperature"],
            "ingredients":["Sushi rice","Nori"],"pairing":"Sake","difficulty":"hard"}"#;
        let (chef, provider) = service(MockProvider::card(Ok(answer.to_string())));
        let card = chef.chef_tips(&TipsRequest::new("Sushi Rolls")).await;

        assert_eq!(card.source, TipSource::Chef);
        assert_eq!(card.tips, vec!["Rinse the rice", "Cool it to body temperature"]);
        assert_eq!(card.pairing, "Sake");
        assert_eq!(card.difficulty, Difficulty::Hard);

        let sent = provider.last_request.lock().unwrap().clone().unwrap();
        assert!(!sent.stream);
        assert_eq!(sent.max_tokens, 500);
    }

    #[tokio::test]
    async fn test_card_not_json_falls_back() {
        let (chef, _) = service(MockProvider::card(Ok("Just cook it well!".into())));
        let card = chef.chef_tips(&TipsRequest::new("pasta al limone")).await;
        assert_eq!(card.source, TipSource::Fallback);
        assert_eq!(card.tips, canned(TipCategory::Pasta));
    }

    #[tokio::test]
    async fn test_card_error_and_empty_fall_back() {
        let (chef, _) = service(MockProvider::card(Err(ApiError::Provider("500".into()))));
        assert_eq!(
            chef.chef_tips(&TipsRequest::new("x")).await.source,
            TipSource::Fallback
        );

        let (chef, _) = service(MockProvider::card(Ok("   ".into())));
        assert_eq!(
            chef.chef_tips(&TipsRequest::new("x")).await.source,
            TipSource::Fallback
        );
    }

    #[test]
    fn test_parse_defaults() {
        let card = ChefTips::parse(r#"{"tips":["a", 3, "b"],"difficulty":"impossible"}"#).unwrap();
        assert_eq!(card.tips, vec!["a", "b"]);
        assert!(card.ingredients.is_empty());
        assert_eq!(card.pairing, DEFAULT_PAIRING);
        assert_eq!(card.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_parse_fenced_answer() {
        let answer = "Here you go:\n```json\n{\"tips\":[\"Salt early\"],\"pairing\":\"Riesling\"}\n```";
        let card = ChefTips::parse(answer).unwrap();
        assert_eq!(card.tips, vec!["Salt early"]);
        assert_eq!(card.pairing, "Riesling");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(ChefTips::parse("[1, 2, 3]").is_none());
        assert!(ChefTips::parse("no braces here").is_none());
        assert!(ChefTips::parse("} backwards {").is_none());
    }
}
