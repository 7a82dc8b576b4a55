//! Input producer manager.
//!
//! The `InputManager` owns the terminal's input devices and, on `start`,
//! spawns one producer task per registered device. Every task posts into
//! the same FSM event queue.
//!
//! ```text
//! ┌─────────────┐
//! │ Card reader │──────►┌─────────────────┐
//! │ task        │       │                 │
//! └─────────────┘       │  Event queue    │──────► Attendance FSM
//!                       │                 │
//! ┌─────────────┐       │                 │
//! │ Shutdown    │──────►└─────────────────┘
//! │ debouncer   │
//! └─────────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use attendance_hardware::manager::{InputConfig, InputManager};
//! use attendance_hardware::mock::{MockInput, MockKeySource};
//! use attendance_core::queue;
//!
//! #[tokio::main]
//! async fn main() -> attendance_hardware::Result<()> {
//!     let (events_tx, mut events_rx) = queue::channel();
//!     let mut manager = InputManager::new(InputConfig::default(), events_tx);
//!
//!     let (reader, _reader_handle) = MockKeySource::new();
//!     let (button, _button_handle) = MockInput::new(true);
//!     manager.register_key_source(reader.into());
//!     manager.register_shutdown_input(button.into());
//!
//!     let handle = manager.start();
//!     let _first = events_rx.get().await;
//!
//!     handle.shutdown().await
//! }
//! ```

use crate::card_reader::CardReader;
use crate::devices::{AnyDigitalInput, AnyKeySource};
use crate::shutdown::ShutdownDebouncer;
use crate::Result;
use attendance_core::constants::{DEFAULT_READER_RETRY_MS, DEFAULT_SHUTDOWN_POLL_MS};
use attendance_core::{Event, QueueSender, TimingConfig};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Timing for the producer tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// Poll interval of the shutdown button.
    pub shutdown_poll: Duration,

    /// Delay before retrying a failed card reader.
    pub reader_retry: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            shutdown_poll: Duration::from_millis(DEFAULT_SHUTDOWN_POLL_MS),
            reader_retry: Duration::from_millis(DEFAULT_READER_RETRY_MS),
        }
    }
}

impl From<&TimingConfig> for InputConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            shutdown_poll: timing.shutdown_poll(),
            reader_retry: timing.reader_retry(),
        }
    }
}

/// Handle to the running producer tasks.
pub struct InputHandle {
    tasks: JoinSet<Result<()>>,
}

impl InputHandle {
    /// Number of producer tasks still tracked.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort every producer task and wait for them to terminate.
    ///
    /// Task errors and panics are logged, never returned.
    pub async fn shutdown(mut self) -> Result<()> {
        self.tasks.abort_all();

        let mut error_count = 0;
        let mut panic_count = 0;

        while let Some(result) = self.tasks.join_next().await {
            let termination = Self::classify_task_result(result);
            match termination {
                TaskTermination::Error => error_count += 1,
                TaskTermination::Panic => panic_count += 1,
                TaskTermination::Success | TaskTermination::Cancelled => {}
            }
            Self::log_termination(termination);
        }

        if error_count + panic_count > 0 {
            warn!(error_count, panic_count, "Input tasks ended abnormally");
        } else {
            debug!("Input tasks stopped");
        }

        Ok(())
    }

    fn classify_task_result(
        result: std::result::Result<Result<()>, tokio::task::JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(e)) => {
                error!(error = %e, "Input task failed");
                TaskTermination::Error
            }
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(e) => {
                error!(error = %e, "Input task panicked");
                TaskTermination::Panic
            }
        }
    }

    fn log_termination(termination: TaskTermination) {
        debug!(?termination, "Input task terminated");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    Success,
    Error,
    /// Expected during shutdown.
    Cancelled,
    Panic,
}

/// Owns the input devices until their producer tasks are spawned.
pub struct InputManager {
    config: InputConfig,
    events: QueueSender<Event>,
    key_source: Option<AnyKeySource>,
    shutdown_input: Option<AnyDigitalInput>,
}

impl InputManager {
    pub fn new(config: InputConfig, events: QueueSender<Event>) -> Self {
        Self {
            config,
            events,
            key_source: None,
            shutdown_input: None,
        }
    }

    /// Register the card reader. Replaces any earlier one.
    pub fn register_key_source(&mut self, source: AnyKeySource) {
        self.key_source = Some(source);
    }

    /// Register the shutdown button line. Replaces any earlier one.
    pub fn register_shutdown_input(&mut self, input: AnyDigitalInput) {
        self.shutdown_input = Some(input);
    }

    /// Spawn one task per registered device.
    pub fn start(self) -> InputHandle {
        let mut tasks = JoinSet::new();

        if let Some(source) = self.key_source {
            let reader = CardReader::new(source, self.config.reader_retry);
            tasks.spawn(reader.run(self.events.clone()));
        }

        if let Some(input) = self.shutdown_input {
            let debouncer = ShutdownDebouncer::new(input, self.config.shutdown_poll);
            tasks.spawn(debouncer.run(self.events.clone()));
        }

        info!(tasks = tasks.len(), "Input tasks started");
        InputHandle { tasks }
    }
}
