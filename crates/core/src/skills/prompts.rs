//! Default prompt templates bundled at compile time.
//!
//! The pipeline treats these as opaque strings. A [`PromptSet`] can be
//! overridden field by field, or from a directory of `<slug>.md` files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Planner - outlines the essay
pub const PLAN: &str = include_str!("defaults/plan.md");

/// Writer - drafts the essay; `{content}` receives the research snippets
pub const WRITER: &str = include_str!("defaults/writer.md");

/// Reflection - critiques the current draft
pub const REFLECTION: &str = include_str!("defaults/reflection.md");

/// Research planner - search queries for the topic
pub const RESEARCH_PLAN: &str = include_str!("defaults/research_plan.md");

/// Research critic - search queries for the critique
pub const RESEARCH_CRITIQUE: &str = include_str!("defaults/research_critique.md");

/// Placeholder in the writer prompt replaced by the research snippets
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// All default prompts with their slugs
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("plan", PLAN),
        ("writer", WRITER),
        ("reflection", REFLECTION),
        ("research_plan", RESEARCH_PLAN),
        ("research_critique", RESEARCH_CRITIQUE),
    ]
}

/// The five system prompts one run uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSet {
    pub plan: String,
    pub writer: String,
    pub reflection: String,
    pub research_plan: String,
    pub research_critique: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            plan: PLAN.to_string(),
            writer: WRITER.to_string(),
            reflection: REFLECTION.to_string(),
            research_plan: RESEARCH_PLAN.to_string(),
            research_critique: RESEARCH_CRITIQUE.to_string(),
        }
    }
}

impl PromptSet {
    /// Writer prompt with the research block substituted in
    pub fn writer_with_content(&self, content: &str) -> String {
        self.writer.replace(CONTENT_PLACEHOLDER, content)
    }

    /// Replace prompts with any `<slug>.md` files found in `dir`.
    ///
    /// Missing files keep their current prompt; unreadable files are errors.
    pub fn with_overrides_from(mut self, dir: &Path) -> std::io::Result<Self> {
        for (slug, _) in all_defaults() {
            let path = dir.join(format!("{}.md", slug));
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path)?;
            tracing::info!(prompt = slug, path = %path.display(), "Loaded prompt override");
            match slug {
                "plan" => self.plan = text,
                "writer" => self.writer = text,
                "reflection" => self.reflection = text,
                "research_plan" => self.research_plan = text,
                "research_critique" => self.research_critique = text,
                _ => {}
            }
        }
        Ok(self)
    }
}
