//! # Essay Graph
//!
//! Executes a single [`Step`] against the current state. Transitions live in
//! [`super::pipeline`]; this module only knows what each step does.

use super::pipeline::Step;
use crate::error::PipelineError;
use crate::gateways::Gateways;
use crate::skills::{CriticSkill, PlannerSkill, PromptSet, ResearcherSkill, WriterSkill};
use crate::state::{EssayState, StateUpdate};

/// Step executor for one run
pub struct EssayGraph {
    planner: PlannerSkill,
    writer: WriterSkill,
    critic: CriticSkill,
    /// `None` when no search gateway is configured
    topic_researcher: Option<ResearcherSkill>,
    critique_researcher: Option<ResearcherSkill>,
}

impl EssayGraph {
    pub fn new(gateways: &Gateways, prompts: &PromptSet, max_results_per_query: u32) -> Self {
        let llm = &gateways.llm;
        let researcher = |system: &str| {
            gateways.search.as_ref().map(|search| {
                ResearcherSkill::new(llm.clone(), search.clone(), system, max_results_per_query)
            })
        };

        Self {
            planner: PlannerSkill::new(llm.clone(), prompts.plan.clone()),
            writer: WriterSkill::new(llm.clone(), prompts.clone()),
            critic: CriticSkill::new(llm.clone(), prompts.reflection.clone()),
            topic_researcher: researcher(&prompts.research_plan),
            critique_researcher: researcher(&prompts.research_critique),
        }
    }

    /// Run `step` and return the partial update it produced
    pub async fn run_step(
        &self,
        step: Step,
        state: &EssayState,
    ) -> Result<StateUpdate, PipelineError> {
        match step {
            Step::Plan => self.planner.run(state).await,
            Step::ResearchPlan => {
                Self::research(self.topic_researcher.as_ref(), step, state, state.task()).await
            }
            Step::Generate => self.writer.run(state).await,
            Step::Reflect => self.critic.run(state).await,
            Step::ResearchCritique => {
                let critique = state.critique().unwrap_or_default();
                Self::research(self.critique_researcher.as_ref(), step, state, critique).await
            }
        }
    }

    async fn research(
        researcher: Option<&ResearcherSkill>,
        step: Step,
        state: &EssayState,
        subject: &str,
    ) -> Result<StateUpdate, PipelineError> {
        match researcher {
            Some(researcher) if state.use_research() => researcher.run(step, subject).await,
            _ => {
                tracing::debug!(%step, "research disabled, skipping");
                Ok(StateUpdate::research_skipped())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResearchStatus;
    use crate::testing::{ScriptedLlm, ScriptedSearch};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_research_skipped_without_search_gateway() {
        let llm = Arc::new(ScriptedLlm::new());
        let graph = EssayGraph::new(&Gateways::new(llm.clone(), None), &PromptSet::default(), 2);
        let state = EssayState::new("X", 1, true);

        for step in [Step::ResearchPlan, Step::ResearchCritique] {
            let update = graph.run_step(step, &state).await.unwrap();
            assert_eq!(update.research, Some(ResearchStatus::Skipped));
            assert!(update.content.is_empty());
        }
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_research_skipped_when_state_disables_it() {
        let llm = Arc::new(ScriptedLlm::new());
        let search = Arc::new(ScriptedSearch::new().otherwise(&["hit"]));
        let graph = EssayGraph::new(
            &Gateways::new(llm.clone(), Some(search.clone())),
            &PromptSet::default(),
            2,
        );
        let state = EssayState::new("X", 1, false);

        let update = graph.run_step(Step::ResearchPlan, &state).await.unwrap();
        assert_eq!(update.research, Some(ResearchStatus::Skipped));
        assert!(llm.calls().is_empty());
        assert!(search.requests().is_empty());
    }

    #[tokio::test]
    async fn test_research_steps_use_their_own_prompt_and_subject() {
        let llm = Arc::new(
            ScriptedLlm::new()
                .json(r#"{"queries": ["topic q"]}"#)
                .json(r#"{"queries": ["critique q"]}"#),
        );
        let search = Arc::new(ScriptedSearch::new().otherwise(&["hit"]));
        let prompts = PromptSet {
            research_plan: "RP".to_string(),
            research_critique: "RC".to_string(),
            ..PromptSet::default()
        };
        let graph = EssayGraph::new(&Gateways::new(llm.clone(), Some(search.clone())), &prompts, 2);

        let mut state = EssayState::new("The topic", 2, true);
        state.apply(&StateUpdate::critique("The critique".to_string()));

        graph.run_step(Step::ResearchPlan, &state).await.unwrap();
        graph.run_step(Step::ResearchCritique, &state).await.unwrap();

        let calls = llm.calls();
        assert!(calls.iter().all(|c| c.structured));
        assert_eq!((calls[0].system.as_str(), calls[0].user.as_str()), ("RP", "The topic"));
        assert_eq!((calls[1].system.as_str(), calls[1].user.as_str()), ("RC", "The critique"));
        assert_eq!(
            search.requests(),
            vec![("topic q".to_string(), 2), ("critique q".to_string(), 2)]
        );
    }
}
