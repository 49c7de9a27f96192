//! # Essayist Core
//!
//! Drafts an essay through a plan → research → write → critique loop,
//! revising until the revision budget runs out.
//!
//! ## Architecture
//!
//! - `orchestrator/` - Step state machine, run driver and streamed updates
//! - `skills/` - One skill per model role (PlannerSkill, WriterSkill, CriticSkill, ResearcherSkill)
//! - `gateways/` - Language-model and web-search clients
//! - `state/` - Essay state, partial updates and the run ledger
//! - `models` - LLM provider configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use essayist_core::config::{Credentials, RunRequest};
//! use essayist_core::orchestrator::{Coordinator, CoordinatorConfig};
//! use futures::StreamExt;
//!
//! let credentials = Credentials::new(Some(openai_key), tavily_key);
//! let coordinator = Coordinator::new(CoordinatorConfig::default());
//! let mut run = coordinator.start(RunRequest::new("Is remote work better?"), &credentials)?;
//! while let Some(update) = run.next().await {
//!     println!("{}", update.step);
//! }
//! let outcome = run.finish().await?;
//! ```

pub mod config;
pub mod error;
pub mod gateways;
pub mod models;
pub mod orchestrator;
pub mod skills;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Credentials, RunRequest, SearchConfig};
pub use error::{GatewayError, PipelineError};
pub use orchestrator::{
    Coordinator, CoordinatorConfig, Notice, RunFailure, RunHandle, RunOutcome, Step, StepUpdate,
};
pub use state::EssayState;
