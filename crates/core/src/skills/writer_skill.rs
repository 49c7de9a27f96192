//! # Writer Skill
//!
//! Drafts the essay from the task, the outline and all research gathered so
//! far. Each run bumps the revision counter by one.

use crate::error::PipelineError;
use crate::gateways::LanguageModel;
use crate::orchestrator::pipeline::Step;
use crate::skills::prompts::PromptSet;
use crate::state::{EssayState, StateUpdate};
use std::sync::Arc;

pub struct WriterSkill {
    llm: Arc<dyn LanguageModel>,
    prompts: PromptSet,
}

impl WriterSkill {
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: PromptSet) -> Self {
        Self { llm, prompts }
    }

    /// User message: the task followed by the plan
    pub fn user_message(state: &EssayState) -> String {
        format!(
            "{}\n\nHere is my plan:\n\n{}",
            state.task(),
            state.plan().unwrap_or_default()
        )
    }

    /// Reads `task`, `plan`, `content`; writes `draft` and `revision_number`
    pub async fn run(&self, state: &EssayState) -> Result<StateUpdate, PipelineError> {
        let system = self.prompts.writer_with_content(&state.research_context());
        let draft = self
            .llm
            .generate(&system, &Self::user_message(state))
            .await
            .map_err(|source| PipelineError::Llm {
                step: Step::Generate,
                source,
            })?;
        Ok(StateUpdate::draft(draft, state.revision_number() + 1))
    }
}
