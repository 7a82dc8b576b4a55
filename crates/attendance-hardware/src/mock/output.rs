//! Mock digital output that records every level it is driven to.

use crate::{HardwareError, Result, traits::DigitalOutput};
use attendance_core::Level;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct OutputState {
    configured: bool,
    failing: bool,
    write_failures: usize,
    created: Instant,
    transitions: Vec<(Duration, Level)>,
}

/// Mock output line for testing and simulation.
///
/// Every `set` is recorded with its offset from creation, measured on the
/// tokio clock so paused-time tests see exact intervals.
///
/// # Examples
///
/// ```
/// use attendance_hardware::mock::MockOutput;
/// use attendance_hardware::traits::DigitalOutput;
/// use attendance_core::Level;
///
/// #[tokio::main]
/// async fn main() -> attendance_hardware::Result<()> {
///     let (mut led, handle) = MockOutput::new("red");
///     led.configure().await?;
///     led.set(Level::Low).await?;
///
///     assert_eq!(handle.level(), Some(Level::Low));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockOutput {
    name: String,
    state: Arc<Mutex<OutputState>>,
}

impl MockOutput {
    pub fn new(name: impl Into<String>) -> (Self, MockOutputHandle) {
        let state = Arc::new(Mutex::new(OutputState {
            configured: false,
            failing: false,
            write_failures: 0,
            created: Instant::now(),
            transitions: Vec::new(),
        }));
        let name = name.into();

        let handle = MockOutputHandle {
            name: name.clone(),
            state: Arc::clone(&state),
        };

        (Self { name, state }, handle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn lock(state: &Mutex<OutputState>) -> MutexGuard<'_, OutputState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DigitalOutput for MockOutput {
    async fn configure(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.failing {
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        state.configured = true;
        Ok(())
    }

    async fn set(&mut self, level: Level) -> Result<()> {
        let mut state = lock(&self.state);
        if state.failing {
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        if state.write_failures > 0 {
            state.write_failures -= 1;
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        if !state.configured {
            return Err(HardwareError::configuration(format!(
                "{} set before configure",
                self.name
            )));
        }
        let at = state.created.elapsed();
        state.transitions.push((at, level));
        Ok(())
    }
}

/// Inspection handle for a [`MockOutput`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockOutputHandle {
    name: String,
    state: Arc<Mutex<OutputState>>,
}

impl MockOutputHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_configured(&self) -> bool {
        lock(&self.state).configured
    }

    /// Last level written, if any.
    pub fn level(&self) -> Option<Level> {
        lock(&self.state).transitions.last().map(|(_, level)| *level)
    }

    /// Every level written, in order.
    pub fn levels(&self) -> Vec<Level> {
        lock(&self.state)
            .transitions
            .iter()
            .map(|(_, level)| *level)
            .collect()
    }

    /// Every level written with its offset from creation.
    pub fn timeline(&self) -> Vec<(Duration, Level)> {
        lock(&self.state).transitions.clone()
    }

    /// Number of writes of `level`.
    pub fn count(&self, level: Level) -> usize {
        lock(&self.state)
            .transitions
            .iter()
            .filter(|(_, l)| *l == level)
            .count()
    }

    pub fn clear(&self) {
        lock(&self.state).transitions.clear();
    }

    /// Make every following operation fail as if the line were unplugged.
    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }

    /// Fail only the next `count` writes.
    pub fn fail_next_writes(&self, count: usize) {
        lock(&self.state).write_failures = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_requires_configure() {
        let (mut out, handle) = MockOutput::new("green");

        assert!(matches!(
            out.set(Level::High).await,
            Err(HardwareError::ConfigurationError { .. })
        ));

        out.configure().await.unwrap();
        assert!(handle.is_configured());
        out.set(Level::High).await.unwrap();
        assert_eq!(handle.level(), Some(Level::High));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeline_uses_tokio_clock() {
        let (mut out, handle) = MockOutput::new("buzzer");
        out.configure().await.unwrap();

        out.set(Level::High).await.unwrap();
        tokio::time::sleep(Duration::from_millis(800)).await;
        out.set(Level::Low).await.unwrap();

        let timeline = handle.timeline();
        assert_eq!(timeline[0], (Duration::ZERO, Level::High));
        assert_eq!(timeline[1], (Duration::from_millis(800), Level::Low));
        assert_eq!(handle.count(Level::High), 1);
    }

    #[tokio::test]
    async fn test_failing_output() {
        let (mut out, handle) = MockOutput::new("blue");
        out.configure().await.unwrap();

        handle.set_failing(true);
        assert!(out.set(Level::Low).await.is_err());
        assert!(handle.levels().is_empty());

        handle.set_failing(false);
        out.set(Level::Low).await.unwrap();
        assert_eq!(handle.levels(), vec![Level::Low]);
    }

    #[tokio::test]
    async fn test_scripted_write_failures() {
        let (mut out, handle) = MockOutput::new("red");
        out.configure().await.unwrap();

        handle.fail_next_writes(1);
        assert!(out.set(Level::High).await.is_err());
        out.set(Level::High).await.unwrap();
        assert_eq!(handle.levels(), vec![Level::High]);
    }
}
