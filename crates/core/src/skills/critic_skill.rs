//! # Critic Skill
//!
//! Reviews the current draft and returns free-form feedback.

use crate::error::PipelineError;
use crate::gateways::LanguageModel;
use crate::orchestrator::pipeline::Step;
use crate::state::{EssayState, StateUpdate};
use std::sync::Arc;

pub struct CriticSkill {
    llm: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl CriticSkill {
    pub fn new(llm: Arc<dyn LanguageModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    /// Reads `draft`, writes `critique`
    pub async fn run(&self, state: &EssayState) -> Result<StateUpdate, PipelineError> {
        let critique = self
            .llm
            .generate(&self.system_prompt, state.draft().unwrap_or_default())
            .await
            .map_err(|source| PipelineError::Llm {
                step: Step::Reflect,
                source,
            })?;
        Ok(StateUpdate::critique(critique))
    }
}
