//! Configuration management for streetfood-chef
//!
//! Supports configuration via:
//! 1. Config file (~/.config/streetfood-chef/config.toml)
//! 2. Environment variables (GROQ_API_KEY, GROQ_MODEL, MEALDB_BASE_URL, etc.)
//! 3. CLI arguments (override file/env settings)
//!
//! A missing API key is a valid configuration: the chef answers from the
//! built-in fallback tips instead of calling the completion API.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Unknown config section: {0}")]
    UnknownSection(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion API used for chef tips
    pub chef: ChefSettings,

    /// Recipe search API
    pub recipes: RecipeSettings,
}

/// Settings for the OpenAI-compatible completion endpoint (Groq by default)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChefSettings {
    /// API key (can also use GROQ_API_KEY env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL, `/chat/completions` is appended
    pub base_url: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Temperature for generation
    pub temperature: f32,

    /// Token budget for streamed tips
    pub stream_max_tokens: u32,

    /// Token budget for the structured tip card
    pub card_max_tokens: u32,

    /// Seconds to wait for the response headers
    pub connect_timeout_secs: u64,

    /// Seconds to wait for each body chunk once streaming
    pub chunk_timeout_secs: u64,

    /// Seconds to wait for the complete tip card response
    pub card_timeout_secs: u64,
}

impl Default for ChefSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            temperature: 0.7,
            stream_max_tokens: 300,
            card_max_tokens: 500,
            connect_timeout_secs: 15,
            chunk_timeout_secs: 30,
            card_timeout_secs: 45,
        }
    }
}

/// TheMealDB settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeSettings {
    /// Base URL of the v1 JSON API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RecipeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.themealdb.com/api/json/v1/1".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("streetfood-chef")
            .join("config.toml")
    }

    /// Load config from default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from specific path, falling back to defaults when the file is absent
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default().with_env_overrides());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config.with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY") {
            // An empty variable means "not configured"
            self.chef.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        if let Some(url) = lookup("GROQ_BASE_URL") {
            self.chef.base_url = url;
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            self.chef.model = model;
        }
        if let Some(url) = lookup("MEALDB_BASE_URL") {
            self.recipes.base_url = url;
        }

        self
    }

    /// Save config to default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to specific path
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Whether a non-empty API key is available
    pub fn has_api_key(&self) -> bool {
        self.chef
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Render the whole config, or one section, as TOML with the key masked
    pub fn render(&self, section: Option<&str>) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if let Some(key) = shown.chef.api_key.as_mut() {
            *key = mask_key(key);
        }

        let content = match section {
            None => toml::to_string_pretty(&shown)?,
            Some("chef") => toml::to_string_pretty(&shown.chef)?,
            Some("recipes") => toml::to_string_pretty(&shown.recipes)?,
            Some(other) => return Err(ConfigError::UnknownSection(other.to_string())),
        };

        Ok(content)
    }

    /// Generate example config content
    pub fn example() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

/// Builder for creating Config programmatically
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.chef.api_key = Some(key.into());
        self
    }

    pub fn chef_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.chef.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.chef.model = model.into();
        self
    }

    pub fn recipes_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.recipes.base_url = url.into();
        self
    }

    pub fn timeouts(mut self, connect_secs: u64, chunk_secs: u64) -> Self {
        self.config.chef.connect_timeout_secs = connect_secs;
        self.config.chef.chunk_timeout_secs = chunk_secs;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
