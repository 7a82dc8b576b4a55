//! Shutdown button debouncer.
//!
//! The button pulls its line low while pressed. Every poll interval the
//! line is sampled; a low sample is confirmed by a second sample one
//! interval later, and only then is a `Shutdown` event posted. Holding the
//! button keeps posting events, one per confirmed pair of samples.

use crate::devices::AnyDigitalInput;
use crate::traits::DigitalInput;
use crate::Result;
use attendance_core::{Event, QueueSender};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Active-low: a low line means the button is pressed.
pub fn is_pressed(line_high: bool) -> bool {
    !line_high
}

/// Producer task polling the shutdown button.
#[derive(Debug)]
pub struct ShutdownDebouncer {
    input: AnyDigitalInput,
    poll_interval: Duration,
}

impl ShutdownDebouncer {
    pub fn new(input: AnyDigitalInput, poll_interval: Duration) -> Self {
        Self {
            input,
            poll_interval,
        }
    }

    async fn sample_pressed(&mut self) -> bool {
        match self.input.read().await {
            Ok(level) => is_pressed(level),
            Err(e) => {
                warn!(error = %e, "Shutdown button read failed");
                false
            }
        }
    }

    /// Poll until the FSM queue closes.
    pub async fn run(mut self, events: QueueSender<Event>) -> Result<()> {
        info!(
            poll_ms = self.poll_interval.as_millis() as u64,
            "Shutdown button polling"
        );

        loop {
            if self.sample_pressed().await {
                tokio::time::sleep(self.poll_interval).await;

                if self.sample_pressed().await {
                    info!("Shutdown button held");
                    if events.put(Event::Shutdown).is_err() {
                        debug!("Event queue closed, shutdown debouncer stopping");
                        return Ok(());
                    }
                }
            }

            if events.is_closed() {
                debug!("Event queue closed, shutdown debouncer stopping");
                return Ok(());
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockInput;
    use attendance_core::{TryGet, queue};

    const POLL: Duration = Duration::from_millis(100);

    #[test]
    fn test_active_low() {
        assert!(is_pressed(false));
        assert!(!is_pressed(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_press_is_ignored() {
        let (input, handle) = MockInput::new(true);
        handle.script([false, true]);
        let (tx, mut rx) = queue::channel();

        let task = tokio::spawn(ShutdownDebouncer::new(input.into(), POLL).run(tx));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(rx.try_get(), TryGet::Empty);
        assert!(handle.reads() > 2);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_held_press_emits_shutdown() {
        let (input, handle) = MockInput::new(true);
        handle.script([false, false]);
        let (tx, mut rx) = queue::channel();

        let task = tokio::spawn(ShutdownDebouncer::new(input.into(), POLL).run(tx));

        assert_eq!(rx.get().await, Some(Event::Shutdown));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.try_get(), TryGet::Empty);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_hold_repeats() {
        let (input, _handle) = MockInput::new(false);
        let (tx, mut rx) = queue::channel();

        let task = tokio::spawn(ShutdownDebouncer::new(input.into(), POLL).run(tx));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        task.abort();

        let mut count = 0;
        while let TryGet::Item(event) = rx.try_get() {
            assert_eq!(event, Event::Shutdown);
            count += 1;
        }
        assert!(count >= 4, "expected repeated events, got {count}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_errors_do_not_stop_polling() {
        let (input, handle) = MockInput::new(false);
        handle.set_failing(true);
        let (tx, mut rx) = queue::channel();

        let task = tokio::spawn(ShutdownDebouncer::new(input.into(), POLL).run(tx));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(rx.try_get(), TryGet::Empty);

        handle.set_failing(false);
        assert_eq!(rx.get().await, Some(Event::Shutdown));
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_queue_closed() {
        let (input, _handle) = MockInput::new(true);
        let (tx, rx) = queue::channel();
        drop(rx);

        ShutdownDebouncer::new(input.into(), POLL)
            .run(tx)
            .await
            .unwrap();
    }
}
