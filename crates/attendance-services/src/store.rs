//! In-process attendance store.

use crate::error::{CapabilityError, Result};
use crate::traits::{AttendanceStore, SwipeKind, TimeEntry};
use attendance_core::CardId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Entries {
    log: Vec<TimeEntry>,
    last_kind: HashMap<CardId, SwipeKind>,
}

/// Keeps time entries in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes, as a full or unmounted medium would.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AttendanceStore for MemoryStore {
    async fn record_swipe(&self, card_id: CardId, at: DateTime<Utc>) -> Result<SwipeKind> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CapabilityError::Storage("store is read-only".into()));
        }

        let mut entries = self.lock();
        let kind = entries
            .last_kind
            .get(&card_id)
            .map_or(SwipeKind::SignIn, SwipeKind::toggled);

        entries.last_kind.insert(card_id, kind);
        entries.log.push(TimeEntry { card_id, kind, at });
        debug!(card_id = %card_id, %kind, "Time entry recorded");

        Ok(kind)
    }

    async fn entries(&self) -> Result<Vec<TimeEntry>> {
        Ok(self.lock().log.clone())
    }

    async fn present(&self) -> Result<Vec<CardId>> {
        let mut present: Vec<CardId> = self
            .lock()
            .last_kind
            .iter()
            .filter(|(_, kind)| **kind == SwipeKind::SignIn)
            .map(|(card, _)| *card)
            .collect();
        present.sort();
        Ok(present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32) -> CardId {
        CardId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_swipes_alternate_per_card() {
        let store = MemoryStore::new();
        let now = Utc::now();

        assert_eq!(store.record_swipe(card(1), now).await.unwrap(), SwipeKind::SignIn);
        assert_eq!(store.record_swipe(card(2), now).await.unwrap(), SwipeKind::SignIn);
        assert_eq!(store.record_swipe(card(1), now).await.unwrap(), SwipeKind::SignOut);
        assert_eq!(store.record_swipe(card(1), now).await.unwrap(), SwipeKind::SignIn);

        assert_eq!(store.entries().await.unwrap().len(), 4);
        assert_eq!(store.present().await.unwrap(), vec![card(1), card(2)]);
    }

    #[tokio::test]
    async fn test_read_only_rejects_without_recording() {
        let store = MemoryStore::new();
        store.set_read_only(true);

        assert!(matches!(
            store.record_swipe(card(7), Utc::now()).await,
            Err(CapabilityError::Storage(_))
        ));
        assert!(store.entries().await.unwrap().is_empty());

        store.set_read_only(false);
        assert_eq!(
            store.record_swipe(card(7), Utc::now()).await.unwrap(),
            SwipeKind::SignIn
        );
    }
}
