//! # Pipeline Steps
//!
//! The essay graph as an explicit state machine.
//!
//! ```text
//! plan → research_plan → generate ─┬─ revision_number > max_revisions ─→ end
//!                           ▲      └─ otherwise ─→ reflect
//!                           └──── research_critique ◀──┘
//! ```

use crate::state::EssayState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Outline the essay
    Plan,
    /// Search the web for the topic
    ResearchPlan,
    /// Write (or rewrite) the draft
    Generate,
    /// Critique the current draft
    Reflect,
    /// Search the web for what the critique asks for
    ResearchCritique,
}

/// Where the graph goes after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(Step),
    End,
}

impl Step {
    /// Every run starts here
    pub const ENTRY: Step = Step::Plan;

    pub fn name(&self) -> &'static str {
        match self {
            Step::Plan => "plan",
            Step::ResearchPlan => "research_plan",
            Step::Generate => "generate",
            Step::Reflect => "reflect",
            Step::ResearchCritique => "research_critique",
        }
    }

    pub fn is_research(&self) -> bool {
        matches!(self, Step::ResearchPlan | Step::ResearchCritique)
    }

    /// Transition out of this step given the state after it ran
    pub fn next(self, state: &EssayState) -> Transition {
        match self {
            Step::Plan => Transition::Next(Step::ResearchPlan),
            Step::ResearchPlan => Transition::Next(Step::Generate),
            Step::Generate => should_continue(state),
            Step::Reflect => Transition::Next(Step::ResearchCritique),
            Step::ResearchCritique => Transition::Next(Step::Generate),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The only branch in the graph, taken right after `generate`
pub fn should_continue(state: &EssayState) -> Transition {
    if state.revisions_exhausted() {
        Transition::End
    } else {
        Transition::Next(Step::Reflect)
    }
}

/// Cursor over the graph for one run
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Step to run next; `None` once the end marker is reached
    pub current: Option<Step>,
    /// Steps already executed, in order
    pub history: Vec<Step>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            current: Some(Step::ENTRY),
            history: Vec::new(),
        }
    }
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the current step done and move along the edge it selects
    pub fn advance(&mut self, state: &EssayState) -> Option<Step> {
        if let Some(step) = self.current {
            self.history.push(step);
            self.current = match step.next(state) {
                Transition::Next(next) => Some(next),
                Transition::End => None,
            };
        }
        self.current
    }

    /// Check if the end marker was reached
    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    /// How many times a step has run so far
    pub fn count(&self, step: Step) -> usize {
        self.history.iter().filter(|s| **s == step).count()
    }
}
