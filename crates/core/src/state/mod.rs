pub mod essay_state;
pub mod run_ledger;

pub use essay_state::{EssayState, ResearchStatus, StateUpdate};
pub use run_ledger::{RunLedger, RunRecord, RunStatus};
