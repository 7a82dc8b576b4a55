//! The attendance FSM loop.
//!
//! # Event delivery
//!
//! - At startup the initial state receives `ENTRY` before any queued event.
//! - Each queued event goes to the handler of the current state.
//! - A handler error sets the context error flag and keeps the state.
//! - Moving to a different state delivers `EXIT` to the old handler, then
//!   `ENTRY` to the new one. Returning the current state fires neither.
//! - After the handler halts the context, the loop returns.
//!
//! # Examples
//!
//! ```no_run
//! use attendance_core::{queue, Event, PatternCatalog, TimingConfig};
//! use attendance_fsm::{AnyStateHandler, AttendanceFsm, FsmExit, HandlerContext, HandlerTable};
//! use attendance_services::reachability::MockReachability;
//! use attendance_fsm::handlers::InitHandler;
//!
//! # async fn example() -> attendance_fsm::Result<()> {
//! let (indicator, _patterns) = queue::channel();
//! let (events, inbox) = queue::channel();
//! let context = HandlerContext::new(indicator, PatternCatalog::default(), TimingConfig::default())
//!     .with_reachability(MockReachability::new(true).into());
//! let table = HandlerTable::new([AnyStateHandler::from(InitHandler)])?;
//!
//! let mut fsm = AttendanceFsm::new(table, context, inbox)?;
//! drop(events);
//! assert_eq!(fsm.run().await, FsmExit::InputClosed);
//! # Ok(())
//! # }
//! ```

use crate::context::HandlerContext;
use crate::error::{FsmError, Result};
use crate::handler::{HandlerTable, StateHandler, StateHandlerResult};
use attendance_core::constants::MAX_TRANSITION_HISTORY;
use attendance_core::{Event, QueueReceiver, StateName};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmExit {
    /// A handler halted the run.
    Shutdown,
    /// Every event producer is gone.
    InputClosed,
}

/// One completed state change.
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: StateName,
    pub to: StateName,
    pub at: Instant,
}

impl StateTransition {
    pub fn new(from: StateName, to: StateName) -> Self {
        Self {
            from,
            to,
            at: Instant::now(),
        }
    }
}

pub struct AttendanceFsm {
    table: HandlerTable,
    context: HandlerContext,
    events: QueueReceiver<Event>,
    current: StateName,
    history: VecDeque<StateTransition>,
    defect_pause: Duration,
    entered: bool,
}

impl AttendanceFsm {
    /// Create an FSM starting in `INIT`.
    ///
    /// # Errors
    ///
    /// Returns `FsmError::MissingHandler` if the table has no `INIT`
    /// handler, or `FsmError::MissingDependency` if a handler needs
    /// something the context lacks.
    pub fn new(
        table: HandlerTable,
        context: HandlerContext,
        events: QueueReceiver<Event>,
    ) -> Result<Self> {
        let initial = StateName::Init;
        if !table.contains(initial) {
            return Err(FsmError::MissingHandler(initial));
        }
        table.validate(&context)?;

        let defect_pause = context.timing().timer_interval();
        Ok(Self {
            table,
            context,
            events,
            current: initial,
            history: VecDeque::with_capacity(MAX_TRANSITION_HISTORY),
            defect_pause,
            entered: false,
        })
    }

    pub fn current_state(&self) -> StateName {
        self.current
    }

    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Completed transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Process events until a handler halts the run or the input closes.
    pub async fn run(&mut self) -> FsmExit {
        if !self.entered {
            self.entered = true;
            info!(state = %self.current, "Attendance FSM started");
            self.invoke(Event::Entry).await;
        }

        loop {
            let Some(event) = self.events.get().await else {
                info!(state = %self.current, "Event queue closed");
                return FsmExit::InputClosed;
            };

            self.dispatch(event).await;

            if self.context.is_halted() {
                info!(state = %self.current, "Attendance FSM halted");
                return FsmExit::Shutdown;
            }
        }
    }

    /// Handle one event in the current state.
    pub async fn dispatch(&mut self, event: Event) {
        debug!(state = %self.current, %event, "Dispatching event");

        let Some(result) = self.invoke(event).await else {
            return;
        };
        if result.did_error {
            return;
        }
        if let Some(next) = result.next_state
            && next != self.current
        {
            self.transition(next).await;
        }
    }

    async fn transition(&mut self, next: StateName) {
        if !self.table.contains(next) {
            error!(from = %self.current, to = %next, "No handler for next state, staying");
            tokio::time::sleep(self.defect_pause).await;
            return;
        }

        self.invoke(Event::Exit).await;

        let transition = StateTransition::new(self.current, next);
        info!(from = %transition.from, to = %transition.to, "State transition");
        self.current = next;
        self.history.push_back(transition);
        if self.history.len() > MAX_TRANSITION_HISTORY {
            self.history.pop_front();
        }

        self.invoke(Event::Entry).await;
    }

    /// Run the current state's handler. `None` means no handler was found.
    async fn invoke(&mut self, event: Event) -> Option<StateHandlerResult> {
        let Some(handler) = self.table.get(self.current) else {
            error!(state = %self.current, %event, "No handler for current state");
            tokio::time::sleep(self.defect_pause).await;
            return None;
        };

        let result = handler.run(&event, &mut self.context).await;
        if result.did_error {
            self.context.set_error();
            warn!(
                state = %self.current,
                %event,
                message = result.error_message.as_deref().unwrap_or("unspecified"),
                "Handler reported an error"
            );
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::AnyStateHandler;
    use crate::handlers::InitHandler;
    use attendance_core::queue::{self, QueueSender};
    use attendance_core::{CardId, PatternCatalog, PatternRequest, TimingConfig, TryGet};
    use attendance_services::reachability::MockReachability;
    use attendance_services::store::MemoryStore;
    use attendance_services::system::MockShutdown;
    use attendance_services::{JobResources, JobWorker, job_queue};
    use std::sync::Arc;

    struct Harness {
        fsm: AttendanceFsm,
        events: QueueSender<Event>,
        indicator: QueueReceiver<PatternRequest>,
        shutdown: MockShutdown,
        _worker: JobWorker,
    }

    fn harness() -> Harness {
        let (indicator_tx, indicator) = queue::channel();
        let (buzzer_tx, _) = queue::channel();
        let (occupancy_tx, _) = queue::channel();
        let (events, inbox) = queue::channel();
        let (dispatcher, worker) = job_queue();
        let shutdown = MockShutdown::new();

        let resources = JobResources {
            store: Arc::new(MemoryStore::new().into()),
            indicator: indicator_tx.clone(),
            buzzer: buzzer_tx,
            occupancy: occupancy_tx,
            patterns: PatternCatalog::default(),
        };
        let context = HandlerContext::new(
            indicator_tx,
            PatternCatalog::default(),
            TimingConfig::default(),
        )
        .with_reachability(MockReachability::new(true).into())
        .with_dispatcher(dispatcher)
        .with_storage(resources)
        .with_system(shutdown.clone().into());

        let fsm = AttendanceFsm::new(HandlerTable::standard(), context, inbox).unwrap();
        Harness {
            fsm,
            events,
            indicator,
            shutdown,
            _worker: worker,
        }
    }

    fn drain(rx: &mut QueueReceiver<PatternRequest>) -> Vec<PatternRequest> {
        let mut items = Vec::new();
        while let TryGet::Item(item) = rx.try_get() {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_new_requires_init_handler() {
        let (indicator, _) = queue::channel();
        let (_, inbox) = queue::channel();
        let context =
            HandlerContext::new(indicator, PatternCatalog::default(), TimingConfig::default());
        let table = HandlerTable::new(Vec::<AnyStateHandler>::new()).unwrap();

        assert!(matches!(
            AttendanceFsm::new(table, context, inbox),
            Err(FsmError::MissingHandler(StateName::Init))
        ));
    }

    #[test]
    fn test_new_fails_fast_on_missing_dependency() {
        let (indicator, _) = queue::channel();
        let (_, inbox) = queue::channel();
        let context =
            HandlerContext::new(indicator, PatternCatalog::default(), TimingConfig::default())
                .with_reachability(MockReachability::new(true).into());

        assert!(matches!(
            AttendanceFsm::new(HandlerTable::standard(), context, inbox),
            Err(FsmError::MissingDependency {
                state: StateName::Temp,
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_event_enters_temp() {
        let mut h = harness();
        let patterns = PatternCatalog::default();

        h.events.put(Event::Init).unwrap();
        drop(h.events);

        assert_eq!(h.fsm.run().await, FsmExit::InputClosed);
        assert_eq!(h.fsm.current_state(), StateName::Temp);
        assert_eq!(h.fsm.history().len(), 1);
        assert_eq!(h.fsm.history()[0].from, StateName::Init);
        assert_eq!(h.fsm.history()[0].to, StateName::Temp);
        assert_eq!(drain(&mut h.indicator), vec![patterns.startup, patterns.ready]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_self_transition_fires_no_entry() {
        let mut h = harness();
        let patterns = PatternCatalog::default();

        for event in [Event::Init, Event::Timer, Event::Timer] {
            h.events.put(event).unwrap();
        }
        drop(h.events);

        h.fsm.run().await;
        assert_eq!(h.fsm.history().len(), 1);
        // One ready pattern from the single TEMP entry.
        assert_eq!(drain(&mut h.indicator), vec![patterns.startup, patterns.ready]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_error_holds_state_and_sets_flag() {
        let mut h = harness();

        for event in [Event::Init, Event::Init] {
            h.events.put(event).unwrap();
        }
        drop(h.events);

        h.fsm.run().await;
        assert_eq!(h.fsm.current_state(), StateName::Temp);
        assert!(h.fsm.context().error_flag());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_halts_once() {
        let mut h = harness();
        let id = CardId::new(1_234_567).unwrap();

        for event in [
            Event::Init,
            Event::CardRead { id },
            Event::Shutdown,
            Event::Timer,
        ] {
            h.events.put(event).unwrap();
        }

        assert_eq!(h.fsm.run().await, FsmExit::Shutdown);
        assert_eq!(h.shutdown.calls(), 1);
        assert_eq!(h.fsm.current_state(), StateName::Temp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_next_handler_keeps_state() {
        let (indicator, _) = queue::channel();
        let (events, inbox) = queue::channel();
        let context =
            HandlerContext::new(indicator, PatternCatalog::default(), TimingConfig::default())
                .with_reachability(MockReachability::new(true).into());
        let table = HandlerTable::new([AnyStateHandler::from(InitHandler)]).unwrap();
        let mut fsm = AttendanceFsm::new(table, context, inbox).unwrap();

        events.put(Event::Init).unwrap();
        drop(events);

        assert_eq!(fsm.run().await, FsmExit::InputClosed);
        assert_eq!(fsm.current_state(), StateName::Init);
        assert!(fsm.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_is_bounded() {
        let mut h = harness();
        h.events.put(Event::Init).unwrap();
        drop(h.events);
        h.fsm.run().await;

        for _ in 0..(MAX_TRANSITION_HISTORY + 10) {
            h.fsm.transition(StateName::Init).await;
            h.fsm.transition(StateName::Temp).await;
        }
        assert_eq!(h.fsm.history().len(), MAX_TRANSITION_HISTORY);
    }
}
