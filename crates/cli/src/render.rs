//! Terminal rendering for step notices and the final result.

use essayist_core::error::PipelineError;
use essayist_core::orchestrator::{Notice, RunOutcome, Step};
use serde::Serialize;

pub const NO_DRAFT: &str = "No draft produced. Check your inputs and try again.";

const RULE: &str = "────────────────────────────────────────";

pub fn notice(notice: &Notice) -> String {
    let heading = match notice {
        Notice::Draft { revision, .. } => format!("{} (revision {})", notice.heading(), revision),
        _ => notice.heading().to_string(),
    };
    format!("\n## {}\n\n{}", heading, notice.body().trim_end())
}

pub fn final_draft(draft: &str) -> String {
    format!("\n{RULE}\nFinal essay\n{RULE}\n\n{}", draft.trim_end())
}

/// The final draft, or the no-draft message
pub fn result(draft: Option<&str>) -> String {
    draft.map_or_else(|| NO_DRAFT.to_string(), final_draft)
}

/// Last JSON line in `--json` mode
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub run_id: String,
    pub steps: &'a [Step],
    pub revision_number: u32,
    pub research_snippets: usize,
    pub draft: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Summary<'a> {
    pub fn new(outcome: &'a RunOutcome, error: Option<&PipelineError>) -> Self {
        Self {
            run_id: outcome.run_id.to_string(),
            steps: &outcome.steps,
            revision_number: outcome.state.revision_number(),
            research_snippets: outcome.state.content().len(),
            draft: outcome.final_draft(),
            error: error.map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use essayist_core::state::{EssayState, StateUpdate};
    use uuid::Uuid;

    #[test]
    fn test_draft_heading_shows_revision() {
        let rendered = notice(&Notice::Draft {
            revision: 2,
            text: "Body.\n".to_string(),
        });
        assert_eq!(rendered, "\n## Draft (revision 2)\n\nBody.");
    }

    #[test]
    fn test_skipped_research_is_explicit() {
        let rendered = notice(&Notice::Research {
            step: Step::ResearchPlan,
            performed: false,
        });
        assert!(rendered.contains("Research (for outline)"));
        assert!(rendered.contains("skipping"));
    }

    #[test]
    fn test_missing_draft_reports_no_draft() {
        assert_eq!(result(None), NO_DRAFT);
        assert!(result(Some("Kept.")).ends_with("Kept."));
    }

    #[test]
    fn test_summary_of_aborted_run() {
        let mut state = EssayState::new("X", 2, false);
        state.apply(&StateUpdate::draft("First pass.".to_string(), 2));
        let outcome = RunOutcome {
            run_id: Uuid::nil(),
            state,
            steps: vec![Step::Plan, Step::ResearchPlan, Step::Generate],
        };
        let error = PipelineError::Config("boom".to_string());

        let json = serde_json::to_value(Summary::new(&outcome, Some(&error))).unwrap();
        assert_eq!(json["draft"], "First pass.");
        assert_eq!(json["steps"][2], "generate");
        assert!(json["error"].as_str().unwrap().contains("boom"));

        let json = serde_json::to_value(Summary::new(&outcome, None)).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_final_draft_banner() {
        let rendered = final_draft("The essay.");
        assert!(rendered.contains("Final essay"));
        assert!(rendered.ends_with("The essay."));
    }
}
