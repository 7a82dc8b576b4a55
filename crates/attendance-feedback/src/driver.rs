//! Async pattern driver loop.
//!
//! The driver owns its output lines for its whole lifetime. Each outer
//! iteration it checks the request queue without blocking; a new request
//! replaces the current one and restarts from `Init`. With no request to
//! render it blocks on the queue. When the queue closes the driver releases
//! its outputs (all quiescent) and returns.
//!
//! A line that failed to configure, or whose write failed, is configured
//! again before its next write. A failed write is retried once on the
//! reconfigured line.

use crate::machine::{OutputAction, PatternMachine, PatternState, Step};
use crate::profile::PatternProfile;
use attendance_core::{Level, PatternRequest, QueueReceiver, TryGet};
use attendance_hardware::{AnyDigitalOutput, DigitalOutput};
use tracing::{debug, error, info, trace, warn};

/// Feedback device task. One instance per device kind.
#[derive(Debug)]
pub struct PatternDriver {
    profile: PatternProfile,
    outputs: Vec<AnyDigitalOutput>,
    configured: Vec<bool>,
    requests: QueueReceiver<PatternRequest>,
}

impl PatternDriver {
    /// Create a driver. `outputs` are indexed by `OutputSelector`.
    pub fn new(
        profile: PatternProfile,
        outputs: Vec<AnyDigitalOutput>,
        requests: QueueReceiver<PatternRequest>,
    ) -> Self {
        if outputs.len() != profile.outputs {
            warn!(
                kind = %profile.kind,
                expected = profile.outputs,
                actual = outputs.len(),
                "Pattern driver output count mismatch"
            );
        }
        let configured = vec![false; outputs.len()];
        Self {
            profile,
            outputs,
            configured,
            requests,
        }
    }

    /// Render requests until the request queue closes.
    pub async fn run(mut self) {
        let kind = self.profile.kind;
        self.configure().await;
        info!(%kind, "Pattern driver started");

        let mut machine: Option<PatternMachine> = None;
        let mut state = PatternState::Init;

        loop {
            match self.requests.try_get() {
                TryGet::Item(request) => {
                    debug!(%kind, %request, "Pattern preempted");
                    machine = Some(PatternMachine::new(self.profile, request));
                    state = PatternState::Init;
                }
                TryGet::Empty => {}
                TryGet::Closed => break,
            }

            if machine.is_none() {
                trace!(%kind, "Pattern driver idle, waiting for request");
                let Some(request) = self.requests.get().await else {
                    break;
                };
                debug!(%kind, %request, "Pattern requested");
                machine = Some(PatternMachine::new(self.profile, request));
                state = PatternState::Init;
            }

            let Some(active) = machine.as_mut() else {
                continue;
            };

            match active.step(state) {
                Ok(step) => {
                    trace!(%kind, %state, action = ?step.action, "Pattern step");
                    self.apply(step).await;
                    match step.next {
                        Some(next) => state = next,
                        None => {
                            debug!(%kind, "Pattern complete");
                            machine = None;
                        }
                    }
                }
                Err(defect) => {
                    error!(%kind, %state, %defect, "Pattern driver defect, retrying");
                    tokio::time::sleep(self.profile.base_interval).await;
                }
            }
        }

        self.release().await;
        info!(%kind, "Pattern driver stopped");
    }

    async fn configure(&mut self) {
        for index in 0..self.outputs.len() {
            self.configure_one(index).await;
        }
    }

    async fn configure_one(&mut self, index: usize) -> bool {
        let (Some(output), Some(configured)) =
            (self.outputs.get_mut(index), self.configured.get_mut(index))
        else {
            return false;
        };
        match output.configure().await {
            Ok(()) => *configured = true,
            Err(e) => {
                *configured = false;
                warn!(kind = %self.profile.kind, index, error = %e, "Output configure failed");
            }
        }
        *configured
    }

    async fn apply(&mut self, step: Step) {
        let active = self.profile.active_level;
        let quiescent = self.profile.quiescent_level();

        match step.action {
            OutputAction::QuiesceAll => self.set_all(quiescent).await,
            OutputAction::Assert(selector) => self.set_one(selector.index(), active).await,
            OutputAction::Deassert(selector) => self.set_one(selector.index(), quiescent).await,
            OutputAction::Hold => {}
        }

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
    }

    async fn set_one(&mut self, index: usize, level: Level) {
        let kind = self.profile.kind;
        if index >= self.outputs.len() {
            warn!(%kind, index, "Output not wired");
            return;
        }

        for attempt in 0..2 {
            if !self.configured[index] && !self.configure_one(index).await {
                return;
            }
            match self.outputs[index].set(level).await {
                Ok(()) => return,
                Err(e) => {
                    warn!(%kind, index, %level, attempt, error = %e, "Output write failed");
                    self.configured[index] = false;
                }
            }
        }
    }

    async fn set_all(&mut self, level: Level) {
        for index in 0..self.outputs.len() {
            self.set_one(index, level).await;
        }
    }

    async fn release(&mut self) {
        let quiescent = self.profile.quiescent_level();
        self.set_all(quiescent).await;
    }
}
