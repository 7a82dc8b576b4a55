use attendance_core::{Event, QueueSender};
use std::time::Duration;
use tracing::debug;

/// Posts `TIMER` into the FSM queue at a fixed interval.
#[derive(Debug)]
pub struct TimerSource {
    interval: Duration,
    events: QueueSender<Event>,
}

impl TimerSource {
    pub fn new(interval: Duration, events: QueueSender<Event>) -> Self {
        Self { interval, events }
    }

    /// Tick until the FSM queue closes.
    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.interval).await;
            if self.events.put(Event::Timer).is_err() {
                debug!("Event queue closed, timer stopping");
                return;
            }
        }
    }
}
