//! Capability trait definitions.
//!
//! Each trait is one narrow interface the terminal's core logic calls to
//! reach something outside the process: the network, a chat channel, the
//! host OS, and the attendance store. Like the device traits, they use
//! native `async fn`; [`dispatch`](crate::dispatch) provides the enum
//! wrappers used to pick an implementation at runtime.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use attendance_core::CardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the terminal can reach the network.
pub trait NetworkReachability: Send + Sync {
    /// Best-effort connectivity check. Never fails; problems read as `false`.
    async fn check(&self) -> bool;
}

/// Remote notification sink (room open/closed topic).
pub trait NotificationChannel: Send + Sync {
    /// Post a topic or message.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::NotificationFailed` if delivery failed.
    async fn post(&self, message: &str) -> Result<()>;
}

/// Host power control.
pub trait SystemControl: Send + Sync {
    /// Power the host off.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::ShutdownFailed` if the host refused.
    async fn shutdown_now(&self) -> Result<()>;
}

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeKind {
    SignIn,
    SignOut,
}

impl SwipeKind {
    /// The kind of the swipe that follows this one.
    pub fn toggled(&self) -> SwipeKind {
        match self {
            SwipeKind::SignIn => SwipeKind::SignOut,
            SwipeKind::SignOut => SwipeKind::SignIn,
        }
    }
}

impl fmt::Display for SwipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwipeKind::SignIn => write!(f, "sign-in"),
            SwipeKind::SignOut => write!(f, "sign-out"),
        }
    }
}

/// One recorded swipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub card_id: CardId,
    pub kind: SwipeKind,
    pub at: DateTime<Utc>,
}

/// Store of attendance time entries.
///
/// Swipes alternate per card: the first swipe of a card signs in, the next
/// signs out, and so on.
pub trait AttendanceStore: Send + Sync {
    /// Record a swipe and return its direction.
    async fn record_swipe(&self, card_id: CardId, at: DateTime<Utc>) -> Result<SwipeKind>;

    /// Every recorded entry, oldest first.
    async fn entries(&self) -> Result<Vec<TimeEntry>>;

    /// Cards whose last swipe signed in.
    async fn present(&self) -> Result<Vec<CardId>>;
}
