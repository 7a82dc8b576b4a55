//! Enum wrappers for capability dispatch.
//!
//! Same approach as the device wrappers in `attendance_hardware::devices`:
//! one concrete type per capability, one variant per provider.

use crate::error::Result;
use crate::notify::{LogNotifier, MockNotifier};
use crate::reachability::{MockReachability, TcpReachability};
use crate::store::MemoryStore;
use crate::system::{CommandShutdown, MockShutdown};
use crate::traits::{
    AttendanceStore, NetworkReachability, NotificationChannel, SwipeKind, SystemControl, TimeEntry,
};
use attendance_core::CardId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyReachability {
    /// TCP connect probe.
    Tcp(TcpReachability),
    /// Fixed answer.
    Mock(MockReachability),
}

impl NetworkReachability for AnyReachability {
    async fn check(&self) -> bool {
        match self {
            Self::Tcp(probe) => probe.check().await,
            Self::Mock(probe) => probe.check().await,
        }
    }
}

impl From<TcpReachability> for AnyReachability {
    fn from(probe: TcpReachability) -> Self {
        Self::Tcp(probe)
    }
}

impl From<MockReachability> for AnyReachability {
    fn from(probe: MockReachability) -> Self {
        Self::Mock(probe)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyNotifier {
    Log(LogNotifier),
    Mock(MockNotifier),
}

impl NotificationChannel for AnyNotifier {
    async fn post(&self, message: &str) -> Result<()> {
        match self {
            Self::Log(channel) => channel.post(message).await,
            Self::Mock(channel) => channel.post(message).await,
        }
    }
}

impl From<LogNotifier> for AnyNotifier {
    fn from(channel: LogNotifier) -> Self {
        Self::Log(channel)
    }
}

impl From<MockNotifier> for AnyNotifier {
    fn from(channel: MockNotifier) -> Self {
        Self::Mock(channel)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnySystemControl {
    /// Runs the configured host command.
    Command(CommandShutdown),
    /// Counts calls, never powers off.
    Mock(MockShutdown),
}

impl SystemControl for AnySystemControl {
    async fn shutdown_now(&self) -> Result<()> {
        match self {
            Self::Command(control) => control.shutdown_now().await,
            Self::Mock(control) => control.shutdown_now().await,
        }
    }
}

impl From<CommandShutdown> for AnySystemControl {
    fn from(control: CommandShutdown) -> Self {
        Self::Command(control)
    }
}

impl From<MockShutdown> for AnySystemControl {
    fn from(control: MockShutdown) -> Self {
        Self::Mock(control)
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum AnyStore {
    Memory(MemoryStore),
}

impl AttendanceStore for AnyStore {
    async fn record_swipe(&self, card_id: CardId, at: DateTime<Utc>) -> Result<SwipeKind> {
        match self {
            Self::Memory(store) => store.record_swipe(card_id, at).await,
        }
    }

    async fn entries(&self) -> Result<Vec<TimeEntry>> {
        match self {
            Self::Memory(store) => store.entries().await,
        }
    }

    async fn present(&self) -> Result<Vec<CardId>> {
        match self {
            Self::Memory(store) => store.present().await,
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}
