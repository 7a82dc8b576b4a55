//! Mock digital input with a settable level and optional scripted samples.

use crate::{HardwareError, Result, traits::DigitalInput};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct InputState {
    level: bool,
    scripted: VecDeque<bool>,
    reads: usize,
    failing: bool,
}

/// Mock input line for testing and simulation.
///
/// Reads first consume any scripted samples, then return the current level.
///
/// # Examples
///
/// ```
/// use attendance_hardware::mock::MockInput;
/// use attendance_hardware::traits::DigitalInput;
///
/// #[tokio::main]
/// async fn main() -> attendance_hardware::Result<()> {
///     let (mut button, handle) = MockInput::new(true);
///     handle.script([false, true]);
///
///     assert!(!button.read().await?);
///     assert!(button.read().await?);
///     assert!(button.read().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockInput {
    state: Arc<Mutex<InputState>>,
}

impl MockInput {
    pub fn new(level: bool) -> (Self, MockInputHandle) {
        let state = Arc::new(Mutex::new(InputState {
            level,
            scripted: VecDeque::new(),
            reads: 0,
            failing: false,
        }));

        (
            Self {
                state: Arc::clone(&state),
            },
            MockInputHandle { state },
        )
    }
}

fn lock(state: &Mutex<InputState>) -> MutexGuard<'_, InputState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DigitalInput for MockInput {
    async fn read(&mut self) -> Result<bool> {
        let mut state = lock(&self.state);
        state.reads += 1;
        if state.failing {
            return Err(HardwareError::read_failed("mock input", "scripted failure"));
        }
        let level = state.level;
        Ok(state.scripted.pop_front().unwrap_or(level))
    }
}

/// Control handle for a [`MockInput`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MockInputHandle {
    state: Arc<Mutex<InputState>>,
}

impl MockInputHandle {
    /// Set the steady-state level.
    pub fn set_level(&self, level: bool) {
        lock(&self.state).level = level;
    }

    /// Queue samples returned by the next reads before the steady level.
    pub fn script(&self, samples: impl IntoIterator<Item = bool>) {
        lock(&self.state).scripted.extend(samples);
    }

    /// Number of reads performed so far.
    pub fn reads(&self) -> usize {
        lock(&self.state).reads
    }

    pub fn set_failing(&self, failing: bool) {
        lock(&self.state).failing = failing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_steady_level() {
        let (mut input, handle) = MockInput::new(true);
        assert!(input.read().await.unwrap());

        handle.set_level(false);
        assert!(!input.read().await.unwrap());
        assert_eq!(handle.reads(), 2);
    }

    #[tokio::test]
    async fn test_scripted_samples_then_level() {
        let (mut input, handle) = MockInput::new(true);
        handle.script([false, false]);

        assert!(!input.read().await.unwrap());
        assert!(!input.read().await.unwrap());
        assert!(input.read().await.unwrap());
    }

    #[tokio::test]
    async fn test_failing_input() {
        let (mut input, handle) = MockInput::new(true);
        handle.set_failing(true);

        assert!(input.read().await.is_err());
        assert_eq!(handle.reads(), 1);
    }
}
