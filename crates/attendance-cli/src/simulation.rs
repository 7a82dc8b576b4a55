//! Scripted input for the simulated provider.
//!
//! Without real hardware the terminal only reacts to what this script
//! feeds it: periodic swipes of one card and, optionally, a held shutdown
//! button.

use attendance_core::CardId;
use attendance_hardware::mock::{MockInputHandle, MockKeySourceHandle};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoScript {
    /// Swipe `card` at this interval.
    pub swipe_every: Option<Duration>,
    pub card: CardId,
    /// Press and hold the shutdown button after this delay.
    pub shutdown_after: Option<Duration>,
}

impl DemoScript {
    /// A script that does nothing but keep the devices alive.
    pub fn idle(card: CardId) -> Self {
        Self {
            swipe_every: None,
            card,
            shutdown_after: None,
        }
    }

    /// Drive the simulated devices. Returns after pressing shutdown, or
    /// never if no shutdown is scripted.
    pub async fn run(self, keys: MockKeySourceHandle, button: MockInputHandle) {
        let shutdown = async {
            match self.shutdown_after {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(shutdown);

        let digits = self.card.padded();
        let mut swipes = self.swipe_every.map(|every| {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            let swiped = tokio::select! {
                () = &mut shutdown => {
                    info!("Demo pressing the shutdown button");
                    // Active low: held pressed until the process exits.
                    button.set_level(false);
                    return;
                }
                () = next_tick(&mut swipes) => {
                    info!(card_id = %self.card, "Demo swipe");
                    keys.swipe(&digits)
                }
            };
            if let Err(e) = swiped {
                warn!(error = %e, "Card reader is gone, demo swipes stop");
                swipes = None;
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_hardware::mock::{MockInput, MockKeySource};
    use attendance_hardware::{DigitalInput, KeySymbolSource};

    #[tokio::test(start_paused = true)]
    async fn test_swipes_then_presses_shutdown() {
        let (mut source, keys) = MockKeySource::new();
        let (mut input, button) = MockInput::new(true);
        let card = CardId::new(42).unwrap();

        let script = DemoScript {
            swipe_every: Some(Duration::from_secs(10)),
            card,
            shutdown_after: Some(Duration::from_secs(25)),
        };
        script.run(keys, button).await;

        // Two swipes of 7 digits plus the terminator, two strokes per key.
        let mut strokes = 0;
        while let Ok(Some(_)) = source.next().await {
            strokes += 1;
        }
        assert_eq!(strokes, 2 * 8 * 2);
        assert!(!input.read().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_script_never_returns() {
        let (_source, keys) = MockKeySource::new();
        let (_input, button) = MockInput::new(true);
        let script = DemoScript::idle(CardId::new(1).unwrap());

        let result =
            tokio::time::timeout(Duration::from_secs(60), script.run(keys, button)).await;
        assert!(result.is_err());
    }
}
