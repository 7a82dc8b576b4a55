//! Room occupancy tracking.
//!
//! The tracker owns the head count. It notifies only when the count crosses
//! the 0/1 boundary: the first person in opens the room, the last one out
//! closes it.
//!
//! The count is not floored at zero. A stray `Decrement` at zero makes it
//! negative, and the next `Increment` then does not announce "open".

use crate::dispatch::AnyNotifier;
use crate::traits::NotificationChannel;
use attendance_core::{OccupancyConfig, OccupancyDelta, QueueReceiver};
use std::fmt;
use tracing::{debug, error, info, warn};

/// A 0/1 boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Opened,
    Closed,
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crossing::Opened => write!(f, "opened"),
            Crossing::Closed => write!(f, "closed"),
        }
    }
}

/// Apply one delta. The crossing is decided on the count before the change.
pub fn apply(count: i64, delta: OccupancyDelta) -> (i64, Option<Crossing>) {
    match delta {
        OccupancyDelta::Increment => {
            let crossing = (count == 0).then_some(Crossing::Opened);
            (count + 1, crossing)
        }
        OccupancyDelta::Decrement => {
            let crossing = (count == 1).then_some(Crossing::Closed);
            (count - 1, crossing)
        }
    }
}

/// Consumer loop over the occupancy queue.
pub struct OccupancyTracker {
    count: i64,
    notifier: AnyNotifier,
    messages: OccupancyConfig,
    deltas: QueueReceiver<OccupancyDelta>,
}

impl OccupancyTracker {
    pub fn new(
        notifier: AnyNotifier,
        messages: OccupancyConfig,
        deltas: QueueReceiver<OccupancyDelta>,
    ) -> Self {
        Self {
            count: 0,
            notifier,
            messages,
            deltas,
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Handle one delta, notifying before the count changes.
    pub async fn handle(&mut self, delta: OccupancyDelta) {
        let (next, crossing) = apply(self.count, delta);

        if let Some(crossing) = crossing {
            let message = match crossing {
                Crossing::Opened => &self.messages.open_message,
                Crossing::Closed => &self.messages.closed_message,
            };
            info!(%crossing, message = %message, "Room status crossing");
            if let Err(e) = self.notifier.post(message).await {
                error!(error = %e, %crossing, "Occupancy notification failed");
            }
        }

        if next < 0 {
            warn!(count = next, "Occupancy count went negative");
        }
        debug!(?delta, from = self.count, to = next, "Occupancy updated");
        self.count = next;
    }

    /// Run until every producer is gone.
    pub async fn run(mut self) {
        info!("Occupancy tracker started");
        while let Some(delta) = self.deltas.get().await {
            self.handle(delta).await;
        }
        info!(count = self.count, "Occupancy tracker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockNotifier;
    use attendance_core::queue;
    use rstest::rstest;
    use attendance_core::OccupancyDelta::{Decrement, Increment};

    #[rstest]
    #[case(0, Increment, 1, Some(Crossing::Opened))]
    #[case(1, Increment, 2, None)]
    #[case(2, Decrement, 1, None)]
    #[case(1, Decrement, 0, Some(Crossing::Closed))]
    #[case(0, Decrement, -1, None)]
    #[case(-1, Increment, 0, None)]
    fn test_apply(
        #[case] count: i64,
        #[case] delta: OccupancyDelta,
        #[case] expected: i64,
        #[case] crossing: Option<Crossing>,
    ) {
        assert_eq!(apply(count, delta), (expected, crossing));
    }

    fn tracker() -> (
        OccupancyTracker,
        MockNotifier,
        attendance_core::QueueSender<OccupancyDelta>,
    ) {
        let notifier = MockNotifier::new();
        let (tx, rx) = queue::channel();
        let tracker = OccupancyTracker::new(notifier.clone().into(), OccupancyConfig::default(), rx);
        (tracker, notifier, tx)
    }

    #[tokio::test]
    async fn test_open_then_close_sequence() {
        let (tracker, notifier, tx) = tracker();
        for delta in [Increment, Increment, Decrement, Decrement] {
            tx.put(delta).unwrap();
        }
        drop(tx);

        tracker.run().await;
        assert_eq!(notifier.posted(), vec!["LAB OPEN", "LAB CLOSED"]);
    }

    #[tokio::test]
    async fn test_negative_count_suppresses_next_open() {
        let (mut tracker, notifier, _tx) = tracker();

        tracker.handle(Decrement).await;
        tracker.handle(Increment).await;
        assert_eq!(tracker.count(), 0);
        assert!(notifier.posted().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_counting() {
        let (mut tracker, notifier, _tx) = tracker();
        notifier.set_failing(true);

        tracker.handle(Increment).await;
        assert_eq!(tracker.count(), 1);

        notifier.set_failing(false);
        tracker.handle(Decrement).await;
        assert_eq!(tracker.count(), 0);
        assert_eq!(notifier.posted(), vec!["LAB CLOSED"]);
    }
}
