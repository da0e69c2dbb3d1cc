//! Streetfood Chef - Michelin-style cooking tips for street food dishes
//!
//! Streams tips for a dish from an OpenAI-compatible chat completion API and
//! falls back to a static tip table whenever the chef cannot be reached.
//!
//! ## Key Features
//!
//! - **Streaming tips**: `TipStream` yields text fragments as they arrive over SSE
//! - **Graceful fallback**: missing keys, HTTP errors and timeouts all end in house tips
//! - **Tip cards**: structured tips with key ingredients, pairing and difficulty
//! - **Recipe search**: TheMealDB search and lookup feeding dishes to the chef
//! - **Chef chat**: an interactive terminal session around all of the above

pub mod api;
pub mod config;
pub mod fallback;
pub mod recipes;
pub mod tips;
pub mod tui;

pub use api::{ApiError, ApiProvider, ChefClient, StreamingProvider, TipsRequest};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use fallback::{fallback_for, Difficulty, FallbackTips, TipCategory};
pub use recipes::{Meal, MealSummary, RecipeClient};
pub use tips::{ChefService, ChefTips, TipSource, TipStream};
