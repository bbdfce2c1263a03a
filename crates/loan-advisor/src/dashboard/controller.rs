//! Request lifecycle: idle, submitting, then settled with a success or a failure.
//!
//! The controller owns the single outcome cell of a dashboard session. A new
//! submission never aborts one already in flight; instead each submission takes a
//! generation number and only the newest generation may settle the cell, so a
//! slow response to an older submission cannot overwrite a newer result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::outcome::{PredictionOutcome, GENERIC_FAILURE_MESSAGE};
use super::profile::ApplicantProfile;
use super::scoring::ScoringClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    Idle,
    Submitting,
    Settled,
}

/// Point-in-time copy of the outcome cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub phase: RequestPhase,
    pub generation: u64,
    pub outcome: PredictionOutcome,
    /// When the current outcome settled; `None` while idle or submitting.
    pub settled_at: Option<DateTime<Utc>>,
}

impl ControllerSnapshot {
    /// The submit affordance is disabled while a request is outstanding.
    pub fn submit_enabled(&self) -> bool {
        self.phase != RequestPhase::Submitting
    }
}

/// Handle for one started submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
}

impl SubmissionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a finished submission produced, and whether it reached the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledSubmission {
    pub outcome: PredictionOutcome,
    /// `false` when a newer submission had already taken over the cell.
    pub applied: bool,
}

#[derive(Debug)]
struct OutcomeCell {
    phase: RequestPhase,
    generation: u64,
    outcome: PredictionOutcome,
    settled_at: Option<DateTime<Utc>>,
}

pub struct PredictionController<C> {
    client: Arc<C>,
    cell: Arc<Mutex<OutcomeCell>>,
}

impl<C> Clone for PredictionController<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<C> PredictionController<C>
where
    C: ScoringClient + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            cell: Arc::new(Mutex::new(OutcomeCell {
                phase: RequestPhase::Idle,
                generation: 0,
                outcome: PredictionOutcome::Pending,
                settled_at: None,
            })),
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let cell = self.lock();
        ControllerSnapshot {
            phase: cell.phase,
            generation: cell.generation,
            outcome: cell.outcome.clone(),
            settled_at: cell.settled_at,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().phase == RequestPhase::Submitting
    }

    /// Moves to `Submitting` and clears the previous outcome.
    pub fn begin(&self) -> SubmissionTicket {
        let mut cell = self.lock();
        cell.generation += 1;
        cell.phase = RequestPhase::Submitting;
        cell.outcome = PredictionOutcome::Pending;
        cell.settled_at = None;
        debug!(generation = cell.generation, "prediction submission started");
        SubmissionTicket {
            generation: cell.generation,
        }
    }

    /// Stores `outcome` if `ticket` is still the newest submission.
    /// Returns `false` when the outcome was discarded as stale.
    pub fn settle(&self, ticket: SubmissionTicket, outcome: PredictionOutcome) -> bool {
        let mut cell = self.lock();
        if ticket.generation != cell.generation {
            debug!(
                stale = ticket.generation,
                current = cell.generation,
                "discarding outcome of superseded submission"
            );
            return false;
        }
        info!(
            generation = ticket.generation,
            succeeded = outcome.prediction().is_some(),
            "prediction settled"
        );
        cell.phase = RequestPhase::Settled;
        cell.outcome = outcome;
        cell.settled_at = Some(Utc::now());
        true
    }

    /// Issues one request for `profile` and waits for it to settle.
    ///
    /// The request runs on its own task, so dropping the returned future does not
    /// leave the cell stuck in `Submitting`. The returned outcome is the one this
    /// submission produced, even if a newer submission has since taken over.
    pub async fn submit(&self, profile: &ApplicantProfile) -> PredictionOutcome {
        let (ticket, handle) = self.spawn_submit(profile.clone());
        match handle.await {
            Ok(settled) => settled.outcome,
            Err(error) => {
                warn!(%error, generation = ticket.generation(), "prediction task aborted");
                let outcome = PredictionOutcome::failed(GENERIC_FAILURE_MESSAGE);
                self.settle(ticket, outcome.clone());
                outcome
            }
        }
    }

    /// Starts a submission in the background and returns once it is `Submitting`.
    pub fn spawn_submit(
        &self,
        profile: ApplicantProfile,
    ) -> (SubmissionTicket, JoinHandle<SettledSubmission>) {
        let ticket = self.begin();
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = controller.request(&profile).await;
            let applied = controller.settle(ticket, outcome.clone());
            SettledSubmission { outcome, applied }
        });
        (ticket, handle)
    }

    async fn request(&self, profile: &ApplicantProfile) -> PredictionOutcome {
        match self.client.predict(profile).await {
            Ok(response) => PredictionOutcome::from_response(response),
            Err(error) => PredictionOutcome::from_error(&error),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OutcomeCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
