//! Shared domain types for the badge-swipe attendance terminal.
//!
//! Every task in the terminal (card reader, shutdown button, pattern drivers,
//! occupancy tracker, attendance FSM) talks to the others only through the
//! [`queue`] primitive defined here, carrying the types from [`types`].

pub mod config;
pub mod constants;
pub mod error;
pub mod queue;
pub mod types;

pub use config::{
    AttendanceConfig, NetworkConfig, OccupancyConfig, PatternCatalog, ProviderKind, SystemConfig,
    TimingConfig,
};
pub use error::{Error, Result};
pub use queue::{QueueReceiver, QueueSender, TryGet};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
