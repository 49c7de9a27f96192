//! Scripted gateways for unit tests.

use crate::error::GatewayError;
use crate::gateways::{LanguageModel, SearchHit, SearchProvider};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub(crate) struct LlmCall {
    pub system: String,
    pub user: String,
    pub structured: bool,
}

type Responder = Box<dyn Fn(&LlmCall) -> Result<String, GatewayError> + Send + Sync>;

/// Replays queued replies, then falls back to an optional responder.
#[derive(Default)]
pub(crate) struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    responder: Option<Responder>,
    calls: Mutex<Vec<LlmCall>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call with `f`
    pub fn responding(
        f: impl Fn(&LlmCall) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Some(Box::new(f)),
            ..Self::default()
        }
    }

    pub fn text(self, reply: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Same queue as `text`; named for readability at structured call sites
    pub fn json(self, raw: &str) -> Self {
        self.text(raw)
    }

    pub fn failure(self, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: LlmCall) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply.map_err(|body| GatewayError::Status { status: 500, body });
        }
        match &self.responder {
            Some(f) => f(&call),
            None => Err(GatewayError::Malformed("no scripted reply left".to_string())),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        self.answer(LlmCall {
            system: system.to_string(),
            user: user.to_string(),
            structured: false,
        })
    }

    async fn generate_json(
        &self,
        system: &str,
        user: &str,
        _schema_name: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, GatewayError> {
        self.answer(LlmCall {
            system: system.to_string(),
            user: user.to_string(),
            structured: true,
        })
    }
}

/// Search results keyed by query, capped at the requested `max_results`
#[derive(Default)]
pub(crate) struct ScriptedSearch {
    results: HashMap<String, Result<Vec<String>, String>>,
    fallback: Vec<String>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(mut self, query: &str, texts: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            Ok(texts.iter().map(|t| t.to_string()).collect()),
        );
        self
    }

    pub fn fails(mut self, query: &str, body: &str) -> Self {
        self.results
            .insert(query.to_string(), Err(body.to_string()));
        self
    }

    /// Results for any query without its own entry
    pub fn otherwise(mut self, texts: &[&str]) -> Self {
        self.fallback = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, GatewayError> {
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        let texts = match self.results.get(query) {
            Some(Ok(texts)) => texts.clone(),
            Some(Err(body)) => {
                return Err(GatewayError::Status {
                    status: 429,
                    body: body.clone(),
                })
            }
            None => self.fallback.clone(),
        };

        Ok(texts
            .into_iter()
            .take(max_results as usize)
            .enumerate()
            .map(|(i, text)| SearchHit {
                title: format!("{} #{}", query, i + 1),
                url: format!("https://example.com/{}", i + 1),
                content: Some(text),
            })
            .collect())
    }
}
