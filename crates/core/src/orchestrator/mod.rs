//! # Essay Orchestration
//!
//! Runs the reflective drafting pipeline.
//!
//! ## Pipeline Flow
//!
//! ```text
//! plan → research_plan → generate ─┬─ (revisions left) → reflect → research_critique → generate
//!                                  └─ (exhausted) → end
//! ```

pub mod coordinator;
pub mod events;
pub mod graph;
pub mod pipeline;

pub use coordinator::{Coordinator, CoordinatorConfig, RunFailure, RunHandle, RunOutcome};
pub use events::{Notice, StepUpdate};
pub use graph::EssayGraph;
pub use pipeline::{should_continue, Pipeline, Step, Transition};
