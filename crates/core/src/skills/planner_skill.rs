//! # Planner Skill
//!
//! Outlines the essay from the user's topic.

use crate::error::PipelineError;
use crate::gateways::LanguageModel;
use crate::orchestrator::pipeline::Step;
use crate::state::{EssayState, StateUpdate};
use std::sync::Arc;

pub struct PlannerSkill {
    llm: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl PlannerSkill {
    pub fn new(llm: Arc<dyn LanguageModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    /// Reads `task`, writes `plan`
    pub async fn run(&self, state: &EssayState) -> Result<StateUpdate, PipelineError> {
        let plan = self
            .llm
            .generate(&self.system_prompt, state.task())
            .await
            .map_err(|source| PipelineError::Llm {
                step: Step::Plan,
                source,
            })?;
        Ok(StateUpdate::plan(plan))
    }
}
