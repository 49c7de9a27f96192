//! # Run Coordinator
//!
//! Drives one pipeline run per request. Each run gets its own state, run id
//! and task; updates are streamed to the caller one step at a time.
//!
//! ```text
//! Coordinator::start ──spawn──▶ run task ── (StepUpdate, ack) ──▶ RunHandle (Stream)
//!                                  ▲                                   │
//!                                  └──── ack on next poll ─────────────┘
//! ```
//!
//! The run task waits for the acknowledgement before starting its next
//! step, so a caller that stops polling stops the run.

use super::events::StepUpdate;
use super::graph::EssayGraph;
use super::pipeline::{Pipeline, Step};
use crate::config::{Credentials, RunRequest, SearchConfig};
use crate::error::PipelineError;
use crate::gateways::Gateways;
use crate::skills::PromptSet;
use crate::state::{EssayState, RunLedger};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

/// Configuration shared by every run a coordinator starts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Search gateway settings
    #[serde(default)]
    pub search: SearchConfig,
    /// System prompts for each step
    #[serde(default)]
    pub prompts: PromptSet,
}

/// A finished run, or what an aborted run got through
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// State after the last completed step
    pub state: EssayState,
    /// Steps completed, in order
    pub steps: Vec<Step>,
}

impl RunOutcome {
    /// The last draft produced, or `None` for "no draft produced"
    pub fn final_draft(&self) -> Option<&str> {
        self.state.draft().filter(|d| !d.is_empty())
    }

    pub fn generate_count(&self) -> usize {
        self.steps.iter().filter(|s| **s == Step::Generate).count()
    }
}

/// An aborted run: the error plus everything streamed before it
#[derive(Debug, Error)]
#[error("run aborted")]
pub struct RunFailure {
    #[source]
    pub error: PipelineError,
    pub partial: RunOutcome,
}

impl RunFailure {
    /// Step the run failed in, if it failed inside a step
    pub fn step(&self) -> Option<Step> {
        self.error.step()
    }

    /// Last draft produced before the abort
    pub fn final_draft(&self) -> Option<&str> {
        self.partial.final_draft()
    }
}

type Handoff = (StepUpdate, oneshot::Sender<()>);

/// Streams a run's step updates; call [`RunHandle::finish`] for the outcome.
///
/// Polling for the next update releases the run into its next step.
/// Dropping the handle stops the run before that step.
pub struct RunHandle {
    run_id: Uuid,
    updates: ReceiverStream<Handoff>,
    pending_ack: Option<oneshot::Sender<()>>,
    /// Replay of every update handed out so far
    state: EssayState,
    steps: Vec<Step>,
    task: JoinHandle<Result<RunOutcome, PipelineError>>,
}

impl RunHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// State as seen through the updates received so far
    pub fn state(&self) -> &EssayState {
        &self.state
    }

    /// Drain remaining updates and wait for the run to end.
    ///
    /// On abort the error comes back with the partial outcome, so the last
    /// draft (if any) is still available.
    pub async fn finish(mut self) -> Result<RunOutcome, RunFailure> {
        while self.next().await.is_some() {}

        let error = match self.task.await {
            Ok(Ok(outcome)) => return Ok(outcome),
            Ok(Err(e)) => e,
            Err(e) => PipelineError::Aborted(e.to_string()),
        };
        Err(RunFailure {
            error,
            partial: RunOutcome {
                run_id: self.run_id,
                state: self.state,
                steps: self.steps,
            },
        })
    }
}

impl Stream for RunHandle {
    type Item = StepUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(ack) = self.pending_ack.take() {
            // the run task may have ended already
            let _ = ack.send(());
        }

        match Pin::new(&mut self.updates).poll_next(cx) {
            Poll::Ready(Some((update, ack))) => {
                self.state.apply(&update.update);
                self.steps.push(update.step);
                self.pending_ack = Some(ack);
                Poll::Ready(Some(update))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The run driver
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    config: CoordinatorConfig,
    ledger: RunLedger,
}

impl Coordinator {
    /// Create a new coordinator with its own ledger
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            ledger: RunLedger::new(),
        }
    }

    /// Share a ledger with other coordinators
    pub fn with_ledger(mut self, ledger: RunLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    /// Forget a run's recorded output; returns whether it was known
    pub async fn clear_run(&self, run_id: Uuid) -> bool {
        let cleared = self.ledger.clear(run_id).await;
        if cleared {
            tracing::info!(%run_id, "Run output cleared");
        }
        cleared
    }

    /// Validate the request, build HTTP gateways and start the run.
    ///
    /// Configuration errors (missing LLM key, bad temperature) are returned
    /// here, before anything is spawned.
    pub fn start(
        &self,
        request: RunRequest,
        credentials: &Credentials,
    ) -> Result<RunHandle, PipelineError> {
        request.validate()?;
        let gateways = Gateways::connect(
            &request.model,
            &self.config.search,
            credentials,
            request.use_research,
        )?;
        Ok(self.start_with(request, gateways))
    }

    /// Start a run against the given gateways. Must be called inside a
    /// Tokio runtime.
    pub fn start_with(&self, request: RunRequest, gateways: Gateways) -> RunHandle {
        let run_id = Uuid::new_v4();
        let use_research = request.use_research && gateways.research_available();
        let state = EssayState::new(request.topic.trim(), request.max_revisions, use_research);
        let graph = EssayGraph::new(
            &gateways,
            &self.config.prompts,
            self.config.search.max_results_per_query,
        );

        let (tx, rx) = mpsc::channel(1);
        let ledger = self.ledger.clone();
        let task = tokio::spawn(drive(run_id, graph, state.clone(), ledger, tx));

        RunHandle {
            run_id,
            updates: ReceiverStream::new(rx),
            pending_ack: None,
            state,
            steps: Vec::new(),
            task,
        }
    }

    /// Run to completion, discarding intermediate updates
    pub async fn run(
        &self,
        request: RunRequest,
        gateways: Gateways,
    ) -> Result<RunOutcome, RunFailure> {
        self.start_with(request, gateways).finish().await
    }
}

const CONSUMER_GONE: &str = "update stream dropped by caller";

#[tracing::instrument(skip_all, fields(run_id = %run_id))]
async fn drive(
    run_id: Uuid,
    graph: EssayGraph,
    mut state: EssayState,
    ledger: RunLedger,
    tx: mpsc::Sender<Handoff>,
) -> Result<RunOutcome, PipelineError> {
    ledger.start(run_id, state.task()).await;
    tracing::info!(
        max_revisions = state.max_revisions(),
        use_research = state.use_research(),
        "Run started"
    );

    let mut pipeline = Pipeline::new();
    while let Some(step) = pipeline.current {
        tracing::info!(%step, revision = state.revision_number(), "Step started");

        let update = match graph.run_step(step, &state).await {
            Ok(update) => update,
            Err(e) => {
                tracing::error!(%step, error = %e, "Run failed");
                ledger.fail(run_id, &e.to_string()).await;
                return Err(e);
            }
        };

        state.apply(&update);
        ledger.record_step(run_id, step, &update).await;

        let sequence = pipeline.history.len();
        pipeline.advance(&state);

        let (ack_tx, ack_rx) = oneshot::channel();
        let delivered = tx
            .send((StepUpdate::new(run_id, sequence, step, update), ack_tx))
            .await
            .is_ok();
        // the last update needs no go-ahead
        let released = delivered && (pipeline.is_complete() || ack_rx.await.is_ok());
        if !released {
            tracing::warn!(%step, "update stream dropped, stopping run");
            ledger.fail(run_id, CONSUMER_GONE).await;
            return Err(PipelineError::Aborted(CONSUMER_GONE.to_string()));
        }
    }

    ledger.complete(run_id).await;
    tracing::info!(
        steps = pipeline.history.len(),
        revision = state.revision_number(),
        "Run completed"
    );

    Ok(RunOutcome {
        run_id,
        state,
        steps: pipeline.history,
    })
}
