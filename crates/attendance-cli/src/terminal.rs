//! Task wiring for a complete terminal.
//!
//! [`Terminal::launch`] creates every queue, spawns every task, and enqueues
//! `INIT`. [`Terminal::run`] drives the attendance FSM to completion and then
//! stops the rest.
//!
//! ```text
//! card reader ──┐
//! button ───────┼──> events ──> AttendanceFsm ──> indicator ──> PatternDriver
//! timer ────────┘                    │
//!                                    └──> jobs ──> JobWorker ──> indicator, buzzer
//!                                                       │
//!                                                       └──> occupancy ──> OccupancyTracker
//! ```

use anyhow::{Context, Result};
use attendance_core::{AttendanceConfig, Event, queue};
use attendance_feedback::{PatternDriver, PatternProfile};
use attendance_fsm::{AttendanceFsm, FsmExit, HandlerContext, HandlerTable, TimerSource};
use attendance_hardware::manager::{InputConfig, InputHandle, InputManager};
use attendance_services::{
    Capabilities, JobResources, OccupancyTracker, SimulationHandles, job_queue,
};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

/// How long background tasks get to drain after the FSM stops.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// A running terminal.
pub struct Terminal {
    fsm: AttendanceFsm,
    inputs: InputHandle,
    timer: JoinHandle<()>,
    background: JoinSet<()>,
}

impl Terminal {
    /// Spawn every task and queue the `INIT` event.
    ///
    /// Returns the simulation handles from `capabilities` so the caller can
    /// keep the simulated devices alive and drive them.
    ///
    /// # Errors
    ///
    /// Fails if a state handler's dependency is missing.
    pub fn launch(
        config: &AttendanceConfig,
        capabilities: Capabilities,
    ) -> Result<(Self, SimulationHandles)> {
        Self::launch_with(config, capabilities, HandlerTable::standard())
    }

    /// [`Terminal::launch`] with a custom handler table.
    ///
    /// Nothing is spawned unless the table validates against the context.
    pub fn launch_with(
        config: &AttendanceConfig,
        capabilities: Capabilities,
        handlers: HandlerTable,
    ) -> Result<(Self, SimulationHandles)> {
        let Capabilities {
            provider,
            indicator_outputs,
            buzzer_output,
            shutdown_input,
            key_source,
            reachability,
            notifier,
            system,
            store,
            simulation,
        } = capabilities;
        let timing = &config.timing;

        let (events_tx, events_rx) = queue::channel();
        let (indicator_tx, indicator_rx) = queue::channel();
        let (buzzer_tx, buzzer_rx) = queue::channel();
        let (occupancy_tx, occupancy_rx) = queue::channel();
        let (dispatcher, worker) = job_queue();

        // Nothing is spawned until the FSM validates.
        let resources = JobResources {
            store,
            indicator: indicator_tx.clone(),
            buzzer: buzzer_tx,
            occupancy: occupancy_tx,
            patterns: config.patterns.clone(),
        };
        let context = HandlerContext::new(indicator_tx, config.patterns.clone(), timing.clone())
            .with_reachability(reachability)
            .with_system(system)
            .with_dispatcher(dispatcher)
            .with_storage(resources);
        let fsm = AttendanceFsm::new(handlers, context, events_rx)
            .context("attendance FSM failed validation")?;
        events_tx
            .put(Event::Init)
            .context("could not queue the INIT event")?;

        let mut background = JoinSet::new();
        background.spawn(
            PatternDriver::new(PatternProfile::indicator(timing), indicator_outputs, indicator_rx)
                .run(),
        );
        background.spawn(
            PatternDriver::new(PatternProfile::buzzer(timing), vec![buzzer_output], buzzer_rx)
                .run(),
        );
        background.spawn(
            OccupancyTracker::new(notifier, config.occupancy.clone(), occupancy_rx).run(),
        );
        background.spawn(async move {
            worker.run().await;
        });

        let timer = tokio::spawn(TimerSource::new(timing.timer_interval(), events_tx.clone()).run());

        let mut inputs = InputManager::new(InputConfig::from(timing), events_tx);
        inputs.register_key_source(key_source);
        inputs.register_shutdown_input(shutdown_input);
        let inputs = inputs.start();

        info!(%provider, "Terminal launched");
        Ok((
            Self {
                fsm,
                inputs,
                timer,
                background,
            },
            simulation,
        ))
    }

    /// Run the FSM until it halts, then stop every other task.
    pub async fn run(mut self) -> FsmExit {
        let exit = self.fsm.run().await;
        info!(?exit, "Attendance FSM finished");
        self.stop().await;
        exit
    }

    /// Stop producers first, then let the consumers drain.
    async fn stop(self) {
        let Self {
            fsm,
            inputs,
            timer,
            mut background,
        } = self;

        if let Err(e) = inputs.shutdown().await {
            warn!(error = %e, "Input tasks did not stop cleanly");
        }
        timer.abort();

        // Dropping the FSM closes the job queue; the worker then drops the
        // last feedback senders and every consumer ends on its own.
        drop(fsm);

        let drained = tokio::time::timeout(STOP_GRACE, async {
            while background.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                remaining = background.len(),
                "Background tasks did not drain, aborting"
            );
            background.shutdown().await;
        }
        info!("Terminal stopped");
    }
}
