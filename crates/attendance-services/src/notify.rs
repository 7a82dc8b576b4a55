//! Notification providers.

use crate::error::{CapabilityError, Result};
use crate::traits::NotificationChannel;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Writes notifications to the log. Remote delivery is not wired up.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl NotificationChannel for LogNotifier {
    async fn post(&self, message: &str) -> Result<()> {
        info!(topic = message, "Room status changed");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MockNotifierState {
    posted: Vec<String>,
    failing: bool,
}

/// Records every posted message. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    state: Arc<Mutex<MockNotifierState>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockNotifierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Messages delivered so far.
    pub fn posted(&self) -> Vec<String> {
        self.lock().posted.clone()
    }

    /// Make deliveries fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

impl NotificationChannel for MockNotifier {
    async fn post(&self, message: &str) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(CapabilityError::NotificationFailed(format!(
                "mock channel rejected {message:?}"
            )));
        }
        state.posted.push(message.to_string());
        Ok(())
    }
}
