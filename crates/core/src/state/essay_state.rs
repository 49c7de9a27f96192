//! # Essay State
//!
//! The record threaded through every step of a run, and the partial
//! updates steps produce.

use serde::{Deserialize, Serialize};

/// Outcome of a research step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResearchStatus {
    /// Queries were generated and searched
    Performed {
        queries: Vec<String>,
        /// Entries appended to the content list (placeholders included)
        snippets: usize,
    },
    /// Research disabled for this run; no gateway was called
    Skipped,
}

impl ResearchStatus {
    pub fn performed(&self) -> bool {
        matches!(self, Self::Performed { .. })
    }
}

/// Partial update produced by one step and merged into [`EssayState`].
///
/// `content` holds only the snippets appended by this step, so merging can
/// never drop earlier research.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchStatus>,
}

impl StateUpdate {
    pub fn plan(plan: String) -> Self {
        Self {
            plan: Some(plan),
            ..Self::default()
        }
    }

    pub fn draft(draft: String, revision_number: u32) -> Self {
        Self {
            draft: Some(draft),
            revision_number: Some(revision_number),
            ..Self::default()
        }
    }

    pub fn critique(critique: String) -> Self {
        Self {
            critique: Some(critique),
            ..Self::default()
        }
    }

    pub fn research(queries: Vec<String>, snippets: Vec<String>) -> Self {
        Self {
            research: Some(ResearchStatus::Performed {
                queries,
                snippets: snippets.len(),
            }),
            content: snippets,
            ..Self::default()
        }
    }

    pub fn research_skipped() -> Self {
        Self {
            research: Some(ResearchStatus::Skipped),
            ..Self::default()
        }
    }
}

/// Pipeline state for a single run.
///
/// Fields are read through accessors; the only way to change them is
/// [`EssayState::apply`], which keeps `task`, `max_revisions` and
/// `use_research` fixed and `content` append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayState {
    task: String,
    plan: Option<String>,
    draft: Option<String>,
    critique: Option<String>,
    content: Vec<String>,
    revision_number: u32,
    max_revisions: u32,
    use_research: bool,
}

impl EssayState {
    /// Fresh state: revision 1, no research, nothing drafted
    pub fn new(task: impl Into<String>, max_revisions: u32, use_research: bool) -> Self {
        Self {
            task: task.into(),
            plan: None,
            draft: None,
            critique: None,
            content: Vec::new(),
            revision_number: 1,
            max_revisions,
            use_research,
        }
    }

    /// Seed the research list before the run starts
    pub fn with_content(mut self, content: Vec<String>) -> Self {
        self.content = content;
        self
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn critique(&self) -> Option<&str> {
        self.critique.as_deref()
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn revision_number(&self) -> u32 {
        self.revision_number
    }

    pub fn max_revisions(&self) -> u32 {
        self.max_revisions
    }

    pub fn use_research(&self) -> bool {
        self.use_research
    }

    /// True once the revision counter has passed the ceiling
    pub fn revisions_exhausted(&self) -> bool {
        self.revision_number > self.max_revisions
    }

    /// Research snippets as one block for the writer prompt
    pub fn research_context(&self) -> String {
        self.content.join("\n\n")
    }

    /// Merge a step's partial update.
    pub fn apply(&mut self, update: &StateUpdate) {
        if let Some(plan) = &update.plan {
            if self.plan.is_none() {
                self.plan = Some(plan.clone());
            } else {
                tracing::warn!("ignoring second plan for the same run");
            }
        }
        if let Some(draft) = &update.draft {
            self.draft = Some(draft.clone());
        }
        if let Some(critique) = &update.critique {
            self.critique = Some(critique.clone());
        }
        self.content.extend(update.content.iter().cloned());
        if let Some(revision) = update.revision_number {
            self.revision_number = self.revision_number.max(revision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = EssayState::new("Is remote work better?", 2, false);
        assert_eq!(state.revision_number(), 1);
        assert!(state.content().is_empty());
        assert_eq!(state.plan(), None);
        assert_eq!(state.draft(), None);
        assert_eq!(state.critique(), None);
        assert_eq!(state.max_revisions(), 2);
        assert!(!state.use_research());
    }

    #[test]
    fn test_plan_is_set_once() {
        let mut state = EssayState::new("X", 1, false);
        state.apply(&StateUpdate::plan("first".to_string()));
        state.apply(&StateUpdate::plan("second".to_string()));
        assert_eq!(state.plan(), Some("first"));
    }

    #[test]
    fn test_content_only_grows() {
        let mut state = EssayState::new("X", 1, true).with_content(vec!["seed".to_string()]);
        state.apply(&StateUpdate::research(
            vec!["q".to_string()],
            vec!["a".to_string(), "a".to_string()],
        ));
        state.apply(&StateUpdate::research_skipped());
        state.apply(&StateUpdate::draft("d".to_string(), 2));
        assert_eq!(state.content(), ["seed", "a", "a"]);
        assert_eq!(state.research_context(), "seed\n\na\n\na");
    }

    #[test]
    fn test_draft_update_bumps_revision() {
        let mut state = EssayState::new("X", 1, false);
        assert!(!state.revisions_exhausted());
        state.apply(&StateUpdate::draft("v1".to_string(), 2));
        assert_eq!(state.revision_number(), 2);
        assert_eq!(state.draft(), Some("v1"));
        assert!(state.revisions_exhausted());
    }

    #[test]
    fn test_zero_budget_is_exhausted_from_the_start() {
        let state = EssayState::new("X", 0, false);
        assert!(state.revisions_exhausted());
        // the check only happens after a draft, so the first pass still runs
        assert_eq!(state.revision_number(), 1);
    }

    #[test]
    fn test_update_serialization_omits_empty_fields() {
        let json = serde_json::to_value(StateUpdate::research_skipped()).unwrap();
        assert_eq!(json, serde_json::json!({ "research": { "status": "skipped" } }));

        let json = serde_json::to_value(StateUpdate::draft("text".to_string(), 3)).unwrap();
        assert_eq!(json["revision_number"], 3);
        assert!(json.get("content").is_none());
    }
}
