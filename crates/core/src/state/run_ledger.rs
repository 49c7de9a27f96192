//! # Run Ledger
//!
//! In-memory record of runs keyed by run id: status plus the latest plan,
//! draft and critique. Nothing is written to disk. Past the retention limit
//! the oldest finished records are dropped; running records are never pruned.

use super::essay_state::StateUpdate;
use crate::orchestrator::pipeline::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

/// What the ledger remembers about one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub topic: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_step: Option<Step>,
    #[serde(default)]
    pub last_plan: Option<String>,
    #[serde(default)]
    pub last_draft: Option<String>,
    #[serde(default)]
    pub last_critique: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Records kept by default before finished runs are pruned
pub const DEFAULT_RETENTION: usize = 64;

/// Shared, cloneable handle to the run records
#[derive(Debug, Clone)]
pub struct RunLedger {
    records: Arc<RwLock<HashMap<Uuid, RunRecord>>>,
    retention: usize,
}

impl Default for RunLedger {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            retention: DEFAULT_RETENTION,
        }
    }
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `retention` records (running ones excepted)
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    /// Register a new run as running
    pub async fn start(&self, run_id: Uuid, topic: &str) {
        let record = RunRecord {
            run_id,
            topic: topic.to_string(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            last_step: None,
            last_plan: None,
            last_draft: None,
            last_critique: None,
            error: None,
        };
        let mut records = self.records.write().await;
        records.insert(run_id, record);
        Self::prune(&mut records, self.retention);
    }

    fn prune(records: &mut HashMap<Uuid, RunRecord>, retention: usize) {
        while records.len() > retention {
            let oldest = records
                .values()
                .filter(|r| r.status != RunStatus::Running)
                .min_by_key(|r| r.started_at)
                .map(|r| r.run_id);
            match oldest {
                Some(run_id) => {
                    records.remove(&run_id);
                    tracing::debug!(%run_id, "pruned run record");
                }
                None => break,
            }
        }
    }

    /// Remember the visible output of a completed step
    pub async fn record_step(&self, run_id: Uuid, step: Step, update: &StateUpdate) {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&run_id) else {
            return;
        };
        record.last_step = Some(step);
        if let Some(plan) = &update.plan {
            record.last_plan = Some(plan.clone());
        }
        if let Some(draft) = &update.draft {
            record.last_draft = Some(draft.clone());
        }
        if let Some(critique) = &update.critique {
            record.last_critique = Some(critique.clone());
        }
    }

    pub async fn complete(&self, run_id: Uuid) {
        self.finish(run_id, RunStatus::Completed, None).await;
    }

    pub async fn fail(&self, run_id: Uuid, error: &str) {
        self.finish(run_id, RunStatus::Failed, Some(error.to_string()))
            .await;
    }

    async fn finish(&self, run_id: Uuid, status: RunStatus, error: Option<String>) {
        if let Some(record) = self.records.write().await.get_mut(&run_id) {
            record.status = status;
            record.finished_at = Some(Utc::now());
            record.error = error;
        }
    }

    pub async fn get(&self, run_id: Uuid) -> Option<RunRecord> {
        self.records.read().await.get(&run_id).cloned()
    }

    /// All runs, oldest first
    pub async fn list(&self) -> Vec<RunRecord> {
        let mut records: Vec<RunRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.started_at);
        records
    }

    /// Forget a run's outputs; returns whether it existed
    pub async fn clear(&self, run_id: Uuid) -> bool {
        self.records.write().await.remove(&run_id).is_some()
    }
}
