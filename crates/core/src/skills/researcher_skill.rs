//! # Researcher Skill
//!
//! Shared by `research_plan` and `research_critique`: ask the model for up to
//! three search queries, search each one, and collect the result text.
//!
//! A failing search call does not stop the step. Its query contributes a
//! placeholder entry instead, so the writer can see that research was
//! attempted and what went wrong.

use crate::error::PipelineError;
use crate::gateways::{LanguageModel, SearchProvider};
use crate::orchestrator::pipeline::Step;
use crate::skills::structured::{generate_structured, QueryPlan};
use crate::state::StateUpdate;
use std::sync::Arc;

/// Placeholder appended when a search call fails
pub fn research_error_snippet(query: &str, error: &dyn std::fmt::Display) -> String {
    format!("[Research error for '{}': {}]", query, error)
}

pub struct ResearcherSkill {
    llm: Arc<dyn LanguageModel>,
    search: Arc<dyn SearchProvider>,
    system_prompt: String,
    max_results: u32,
}

impl ResearcherSkill {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        system_prompt: impl Into<String>,
        max_results: u32,
    ) -> Self {
        Self {
            llm,
            search,
            system_prompt: system_prompt.into(),
            max_results,
        }
    }

    /// Research `subject` (the task or the critique) on behalf of `step`.
    ///
    /// Returns an update whose `content` lists new snippets in fetch order.
    pub async fn run(&self, step: Step, subject: &str) -> Result<StateUpdate, PipelineError> {
        let plan: QueryPlan =
            generate_structured(self.llm.as_ref(), step, &self.system_prompt, subject).await?;

        let mut snippets = Vec::new();
        for query in &plan.queries {
            match self.search.search(query, self.max_results).await {
                Ok(hits) => {
                    let before = snippets.len();
                    snippets.extend(hits.iter().filter_map(|h| h.text()).map(str::to_string));
                    tracing::debug!(%step, query = %query, found = snippets.len() - before, "search complete");
                }
                Err(e) => {
                    tracing::warn!(%step, query = %query, error = %e, "search failed, recording placeholder");
                    snippets.push(research_error_snippet(query, &e));
                }
            }
        }

        tracing::info!(%step, queries = plan.queries.len(), snippets = snippets.len(), "Research complete");
        Ok(StateUpdate::research(plan.queries, snippets))
    }
}
