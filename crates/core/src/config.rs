//! # Run Configuration
//!
//! Everything a run needs is passed in by value: credentials, model choice,
//! search settings and the user's request. Nothing here reads the process
//! environment; the front end does that once and hands the values over.

use crate::error::PipelineError;
use crate::models::ModelConfig;
use serde::{Deserialize, Serialize};

/// API keys for the external services.
///
/// An empty or whitespace-only key counts as absent.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Key for the language-model provider (required)
    pub llm_api_key: Option<String>,
    /// Key for the search provider (optional; research is disabled without it)
    pub search_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &self.llm_api_key().map(|_| "<redacted>"))
            .field("search_api_key", &self.search_api_key().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(llm_api_key: Option<String>, search_api_key: Option<String>) -> Self {
        Self {
            llm_api_key,
            search_api_key,
        }
    }

    /// Language-model key, if one was supplied
    pub fn llm_api_key(&self) -> Option<&str> {
        non_blank(self.llm_api_key.as_deref())
    }

    /// Search key, if one was supplied
    pub fn search_api_key(&self) -> Option<&str> {
        non_blank(self.search_api_key.as_deref())
    }

    /// The language-model key, or a configuration error
    pub fn require_llm_api_key(&self) -> Result<&str, PipelineError> {
        self.llm_api_key().ok_or_else(|| {
            PipelineError::Config("a language model API key is required".to_string())
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Settings for the web search gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Search API root
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Results requested for each generated query
    pub max_results_per_query: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            timeout_secs: 10,
            max_results_per_query: 2,
        }
    }
}

impl SearchConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// One user request: what to write and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRequest {
    /// Essay topic or question
    pub topic: String,
    /// Model and sampling settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Whether the user asked for web research
    #[serde(default = "default_use_research")]
    pub use_research: bool,
    /// Revision ceiling; any value is accepted, including 0
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,
}

fn default_use_research() -> bool {
    true
}

fn default_max_revisions() -> u32 {
    2
}

impl RunRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            model: ModelConfig::default(),
            use_research: default_use_research(),
            max_revisions: default_max_revisions(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_research(mut self, use_research: bool) -> Self {
        self.use_research = use_research;
        self
    }

    pub fn with_max_revisions(mut self, max_revisions: u32) -> Self {
        self.max_revisions = max_revisions;
        self
    }

    /// Reject settings the gateways cannot honour
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.model.temperature_in_range() {
            return Err(PipelineError::Config(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.model.trim().is_empty() {
            return Err(PipelineError::Config("model name is empty".to_string()));
        }
        Ok(())
    }
}
