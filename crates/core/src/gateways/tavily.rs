//! # Tavily Search Client
//!
//! `POST {base_url}/search` with a bearer key; returns the `results` array.

use super::{SearchHit, SearchProvider};
use crate::config::SearchConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

pub struct TavilyClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl TavilyClient {
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("essayist/0.1")
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/search", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, GatewayError> {
        tracing::debug!(query, max_results, "web search");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest { query, max_results })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        Ok(parsed.results)
    }
}
