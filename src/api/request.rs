//! API request structures

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// System instruction for streamed tips
pub const STREAM_SYSTEM_PROMPT: &str = "You are a passionate Michelin-star chef. \
Give 3-4 practical, specific tips for this dish. Be concise and actionable.";

/// System instruction for the structured tip card
pub const CARD_SYSTEM_PROMPT: &str = "You are a Michelin-star chef with 30 years of experience.
You are an expert in culinary arts, flavor combinations, and cooking techniques.
You only discuss food and cooking. You give practical, actionable tips for improving dishes.
Always respond in JSON format with: tips (array of 3-4 tips), ingredients (key ingredients list),
pairing (wine/drink suggestion), difficulty (easy/medium/hard)";

/// What the chef is asked about. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipsRequest {
    /// Dish being cooked, also drives fallback selection
    pub dish_name: String,

    /// Main ingredients, listed in the prompt when present
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Cuisine hint such as "Italian"
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl TipsRequest {
    pub fn new(dish_name: impl Into<String>) -> Self {
        Self {
            dish_name: dish_name.into(),
            ingredients: Vec::new(),
            cuisine: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// The user prompt sent to the chef
    pub fn prompt(&self) -> String {
        let mut prompt = format!("I am preparing \"{}\"", self.dish_name);

        if let Some(cuisine) = self.cuisine.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!(" ({} cuisine)", cuisine));
        }

        if !self.ingredients.is_empty() {
            prompt.push_str(&format!(
                ". The main ingredients are: {}",
                self.ingredients.join(", ")
            ));
        }

        prompt.push_str(
            ". What are your top Michelin-level tips to make this dish exceptional? \
             \nAlso suggest a drink pairing and estimate the difficulty level.",
        );

        prompt
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Provider-neutral chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub stream: bool,
}

impl CompletionRequest {
    /// Streamed "3-4 concise tips" request
    pub fn streaming_tips(request: &TipsRequest, max_tokens: u32) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: STREAM_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: request.prompt(),
                },
            ],
            max_tokens,
            stream: true,
        }
    }

    /// Non-streaming request for the JSON tip card
    pub fn tip_card(request: &TipsRequest, max_tokens: u32) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: CARD_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: request.prompt(),
                },
            ],
            max_tokens,
            stream: false,
        }
    }

    /// OpenAI-compatible JSON body
    pub fn to_body(&self, model: &str, temperature: f32) -> Value {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "content": m.content
                })
            })
            .collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": self.max_tokens,
        });

        if self.stream {
            body["stream"] = json!(true);
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_everything() {
        let request = TipsRequest::new("Pad Thai")
            .with_cuisine("Thai")
            .with_ingredients(vec!["Rice noodles".into(), "Tamarind".into()]);

        let prompt = request.prompt();
        assert!(prompt.starts_with(
            "I am preparing \"Pad Thai\" (Thai cuisine). The main ingredients are: Rice noodles, Tamarind. "
        ));
        assert!(prompt.ends_with("estimate the difficulty level."));
    }

    #[test]
    fn test_prompt_minimal() {
        let prompt = TipsRequest::new("Bratwurst").prompt();
        assert!(prompt.starts_with("I am preparing \"Bratwurst\". What are your top"));
        assert!(!prompt.contains("cuisine)"));
        assert!(!prompt.contains("main ingredients"));
    }

    #[test]
    fn test_streaming_body() {
        let request = TipsRequest::new("Fish Tacos");
        let body = CompletionRequest::streaming_tips(&request, 300).to_body("mixtral-8x7b-32768", 0.7);

        assert_eq!(body["model"], "mixtral-8x7b-32768");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], STREAM_SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], request.prompt());
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_card_body_is_not_streamed() {
        let body = CompletionRequest::tip_card(&TipsRequest::new("Coq au Vin"), 500).to_body("m", 0.5);
        assert!(body.get("stream").is_none());
        assert_eq!(body["max_tokens"], 500);
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("Always respond in JSON format"));
    }
}
