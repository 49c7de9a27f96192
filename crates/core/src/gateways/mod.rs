//! # Gateways
//!
//! Thin, stateless wrappers over the external services the pipeline calls.
//!
//! - `openai` - OpenAI-compatible Chat Completions client
//! - `tavily` - Tavily web search client
//!
//! The orchestrator only sees the [`LanguageModel`] and [`SearchProvider`]
//! traits, so tests swap in scripted implementations.

pub mod openai;
pub mod tavily;

use crate::config::{Credentials, SearchConfig};
use crate::error::{GatewayError, PipelineError};
use crate::models::ModelConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use openai::ChatCompletionsClient;
pub use tavily::TavilyClient;

/// A remote language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-form text for a system instruction plus one user message
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError>;

    /// Raw model output constrained to `schema`; decoding is the caller's job
    async fn generate_json(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GatewayError>;
}

/// One search result
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Extracted page text; may be missing or empty
    #[serde(default)]
    pub content: Option<String>,
}

impl SearchHit {
    /// The snippet text, when there is any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// A remote web search service.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, GatewayError>;
}

/// The collaborators one run talks to.
///
/// `search` is `None` when no search credential was configured or research
/// was not requested; research steps then never touch the network.
#[derive(Clone)]
pub struct Gateways {
    pub llm: Arc<dyn LanguageModel>,
    pub search: Option<Arc<dyn SearchProvider>>,
}

impl Gateways {
    pub fn new(llm: Arc<dyn LanguageModel>, search: Option<Arc<dyn SearchProvider>>) -> Self {
        Self { llm, search }
    }

    /// Build HTTP gateways from explicit configuration.
    ///
    /// Fails with a configuration error when the language-model key is
    /// missing. The search gateway is only built when research is requested
    /// and a search key is present.
    pub fn connect(
        model: &ModelConfig,
        search: &SearchConfig,
        credentials: &Credentials,
        research_requested: bool,
    ) -> Result<Self, PipelineError> {
        let llm_key = credentials.require_llm_api_key()?;
        let llm = ChatCompletionsClient::new(model, llm_key)
            .map_err(|e| PipelineError::Config(format!("cannot build LLM client: {}", e)))?;

        let search: Option<Arc<dyn SearchProvider>> =
            match (research_requested, credentials.search_api_key()) {
                (true, Some(key)) => {
                    let client = TavilyClient::new(search, key).map_err(|e| {
                        PipelineError::Config(format!("cannot build search client: {}", e))
                    })?;
                    Some(Arc::new(client))
                }
                _ => None,
            };

        Ok(Self {
            llm: Arc::new(llm),
            search,
        })
    }

    /// Whether research steps will actually search
    pub fn research_available(&self) -> bool {
        self.search.is_some()
    }
}
