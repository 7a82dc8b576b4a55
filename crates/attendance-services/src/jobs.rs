//! Asynchronous persistence jobs.
//!
//! Every card read turns into a [`PersistenceJob`] that records the swipe,
//! shows the matching feedback, and moves the occupancy count. Jobs go
//! through a [`JobDispatcher`] to a single [`JobWorker`], so the FSM never
//! waits on storage and jobs for the same card stay in order.

use crate::dispatch::AnyStore;
use crate::error::{CapabilityError, Result};
use crate::traits::{AttendanceStore, SwipeKind};
use attendance_core::queue::{self, QueueReceiver, QueueSender};
use attendance_core::{CardId, OccupancyDelta, PatternCatalog, PatternRequest};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Handles a job needs to report its outcome.
#[derive(Debug, Clone)]
pub struct JobResources {
    pub store: Arc<AnyStore>,
    pub indicator: QueueSender<PatternRequest>,
    pub buzzer: QueueSender<PatternRequest>,
    pub occupancy: QueueSender<OccupancyDelta>,
    pub patterns: PatternCatalog,
}

impl JobResources {
    fn show(&self, pattern: PatternRequest) {
        if let Err(e) = self.indicator.put(pattern) {
            warn!(error = %e, %pattern, "Indicator queue closed");
        }
    }

    fn beep(&self, pattern: PatternRequest) {
        if let Err(e) = self.buzzer.put(pattern) {
            warn!(error = %e, %pattern, "Buzzer queue closed");
        }
    }

    fn count(&self, delta: OccupancyDelta) {
        if let Err(e) = self.occupancy.put(delta) {
            warn!(error = %e, ?delta, "Occupancy queue closed");
        }
    }
}

/// Write one time entry for a swipe.
#[derive(Debug)]
pub struct PersistenceJob {
    pub id: Uuid,
    pub card_id: CardId,
    pub requested_at: DateTime<Utc>,
    resources: JobResources,
}

impl PersistenceJob {
    pub fn new(card_id: CardId, resources: JobResources) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            requested_at: Utc::now(),
            resources,
        }
    }

    /// Record the swipe and publish its feedback.
    ///
    /// On success the indicator and buzzer show the sign-in or sign-out
    /// pattern and the occupancy count moves. On failure only the
    /// `write_failed` pattern is shown.
    pub async fn execute(self) -> Result<SwipeKind> {
        let Self {
            id,
            card_id,
            requested_at,
            resources,
        } = self;
        debug!(%id, card_id = %card_id, "Executing persistence job");

        match resources.store.record_swipe(card_id, requested_at).await {
            Ok(kind) => {
                let patterns = &resources.patterns;
                match kind {
                    SwipeKind::SignIn => {
                        resources.show(patterns.signed_in);
                        resources.beep(patterns.signed_in_beep);
                        resources.count(OccupancyDelta::Increment);
                    }
                    SwipeKind::SignOut => {
                        resources.show(patterns.signed_out);
                        resources.beep(patterns.signed_out_beep);
                        resources.count(OccupancyDelta::Decrement);
                    }
                }
                info!(%id, card_id = %card_id, %kind, "Swipe recorded");
                Ok(kind)
            }
            Err(e) => {
                error!(%id, card_id = %card_id, error = %e, "Failed to record swipe");
                resources.show(resources.patterns.write_failed);
                Err(e)
            }
        }
    }
}

/// Create a connected dispatcher and worker.
pub fn job_queue() -> (JobDispatcher, JobWorker) {
    let (tx, rx) = queue::channel();
    (JobDispatcher { jobs: tx }, JobWorker { jobs: rx })
}

/// Submitting side of the job queue.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    jobs: QueueSender<PersistenceJob>,
}

impl JobDispatcher {
    /// Hand a job to the worker without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::DispatchClosed` if the worker is gone.
    pub fn submit(&self, job: PersistenceJob) -> Result<()> {
        let id = job.id;
        self.jobs
            .put(job)
            .map_err(|_| CapabilityError::DispatchClosed)?;
        debug!(%id, "Job submitted");
        Ok(())
    }
}

/// Executes jobs one at a time in submission order.
#[derive(Debug)]
pub struct JobWorker {
    jobs: QueueReceiver<PersistenceJob>,
}

/// Outcome counts of a finished worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub completed: usize,
    pub failed: usize,
}

impl JobWorker {
    /// Run until every dispatcher is dropped.
    pub async fn run(mut self) -> JobStats {
        let mut stats = JobStats::default();
        while let Some(job) = self.jobs.get().await {
            match job.execute().await {
                Ok(_) => stats.completed += 1,
                Err(_) => stats.failed += 1,
            }
        }
        info!(
            completed = stats.completed,
            failed = stats.failed,
            "Job worker stopped"
        );
        stats
    }
}
