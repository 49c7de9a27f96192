//! # Essayist Models
//!
//! Language-model selection for the pipeline. Every supported provider
//! speaks the OpenAI Chat Completions protocol; they differ only in base
//! URL and the environment variable that conventionally holds the key.

use serde::{Deserialize, Serialize};

/// Models offered by the front end, cheapest first.
pub const AVAILABLE_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-3.5-turbo"];

/// Supported LLM providers
///
/// - OpenAI (GPT) - `OPENAI_API_KEY`
/// - OpenRouter (Gateway) - `OPENROUTER_API_KEY`
/// - DeepSeek - `DEEPSEEK_API_KEY`
/// - Grok (xAI) - `XAI_API_KEY`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    OpenRouter,
    DeepSeek,
    Grok,
}

impl LlmProvider {
    /// Get all available providers
    pub fn all() -> Vec<LlmProvider> {
        vec![
            LlmProvider::OpenAI,
            LlmProvider::OpenRouter,
            LlmProvider::DeepSeek,
            LlmProvider::Grok,
        ]
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::Grok => "Grok",
        }
    }

    /// Environment variable the front end reads the key from
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LlmProvider::Grok => "XAI_API_KEY",
        }
    }

    /// Chat Completions root for this provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1",
            LlmProvider::Grok => "https://api.x.ai/v1",
        }
    }
}

/// Configuration for LLM model selection
///
/// ## Example
/// ```rust,ignore
/// use essayist_core::models::{ModelConfig, LlmProvider};
///
/// let config = ModelConfig::new("gpt-4o").with_temperature(0.3);
/// let config = ModelConfig::with_provider(LlmProvider::OpenRouter, "openai/gpt-4o");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// LLM provider to use
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g., "gpt-4o-mini")
    pub model: String,
    /// Sampling temperature, 0.0 - 1.0
    #[serde(default)]
    pub temperature: f32,
    /// Optional base URL override for OpenAI-compatible APIs
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            model: AVAILABLE_MODELS[0].to_string(),
            temperature: 0.0,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelConfig {
    /// Create a new model config with default provider (OpenAI)
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Create config for a specific provider
    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set base URL (for self-hosted or proxied endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Base URL actually used for requests, without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Whether the temperature lies in the accepted 0.0 - 1.0 range
    pub fn temperature_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.temperature)
    }
}
