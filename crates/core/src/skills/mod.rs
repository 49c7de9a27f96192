//! # Essayist Skills
//!
//! One skill per language-model role in the pipeline.
//!
//! ```text
//! Orchestrator
//!   └── Skills (run against EssayState, return a StateUpdate)
//!         └── Gateways (LanguageModel, SearchProvider)
//! ```
//!
//! - `PlannerSkill` - outline the essay (`plan`)
//! - `WriterSkill` - draft and redraft (`generate`)
//! - `CriticSkill` - critique the draft (`reflect`)
//! - `ResearcherSkill` - query generation and web search (`research_plan`, `research_critique`)

pub mod prompts;
pub mod structured;

pub mod critic_skill;
pub mod planner_skill;
pub mod researcher_skill;
pub mod writer_skill;

// Re-exports for convenience
pub use critic_skill::CriticSkill;
pub use planner_skill::PlannerSkill;
pub use prompts::PromptSet;
pub use researcher_skill::ResearcherSkill;
pub use structured::{QueryPlan, StructuredOutput};
pub use writer_skill::WriterSkill;
