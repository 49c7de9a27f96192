//! # Run Events
//!
//! One [`StepUpdate`] is streamed per completed step. [`Notice`] is the
//! caller-facing view of an update: what a front end shows after each step.

use super::pipeline::Step;
use crate::state::{ResearchStatus, StateUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed step and the partial state it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpdate {
    /// Run this update belongs to
    pub run_id: Uuid,
    /// Zero-based position in the run
    pub sequence: usize,
    pub step: Step,
    pub timestamp: DateTime<Utc>,
    pub update: StateUpdate,
}

impl StepUpdate {
    pub fn new(run_id: Uuid, sequence: usize, step: Step, update: StateUpdate) -> Self {
        Self {
            run_id,
            sequence,
            step,
            timestamp: Utc::now(),
            update,
        }
    }

    /// What to show the user for this step, if anything
    pub fn notice(&self) -> Option<Notice> {
        let update = &self.update;
        match self.step {
            Step::Plan => update.plan.clone().map(|text| Notice::Outline { text }),
            Step::Generate => update
                .draft
                .clone()
                .filter(|d| !d.is_empty())
                .map(|text| Notice::Draft {
                    revision: update.revision_number.unwrap_or_default(),
                    text,
                }),
            Step::Reflect => update
                .critique
                .clone()
                .filter(|c| !c.is_empty())
                .map(|text| Notice::Critique { text }),
            Step::ResearchPlan | Step::ResearchCritique => Some(Notice::Research {
                step: self.step,
                performed: update
                    .research
                    .as_ref()
                    .is_some_and(ResearchStatus::performed),
            }),
        }
    }
}

/// Caller-facing summary of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Outline { text: String },
    Draft { revision: u32, text: String },
    Critique { text: String },
    Research { step: Step, performed: bool },
}

impl Notice {
    pub fn heading(&self) -> &'static str {
        match self {
            Notice::Outline { .. } => "Outline",
            Notice::Draft { .. } => "Draft",
            Notice::Critique { .. } => "Critique",
            Notice::Research {
                step: Step::ResearchCritique,
                ..
            } => "Research (for critique)",
            Notice::Research { .. } => "Research (for outline)",
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Notice::Outline { text } | Notice::Draft { text, .. } | Notice::Critique { text } => {
                text.as_str()
            }
            Notice::Research {
                performed: false, ..
            } => "Research disabled or unavailable; skipping.",
            Notice::Research {
                step: Step::ResearchCritique,
                ..
            } => "Fetched additional context to guide revisions.",
            Notice::Research { .. } => "Collected context to inform drafting.",
        }
    }
}
