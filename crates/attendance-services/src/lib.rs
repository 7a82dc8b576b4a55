//! External capabilities and background services for the attendance
//! terminal.
//!
//! # Capabilities
//!
//! The core reaches outside the process only through the traits in
//! [`traits`]:
//!
//! - [`NetworkReachability`]: is the network up?
//! - [`NotificationChannel`]: post a room open/closed topic.
//! - [`SystemControl`]: power the host off.
//! - [`AttendanceStore`]: record swipes.
//!
//! [`provider::CapabilityProvider`] picks the implementations once at
//! startup.
//!
//! # Services
//!
//! - [`occupancy::OccupancyTracker`] counts people in the room.
//! - [`jobs::JobWorker`] executes persistence jobs submitted through a
//!   [`jobs::JobDispatcher`].

pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod notify;
pub mod occupancy;
pub mod provider;
pub mod reachability;
pub mod store;
pub mod system;
pub mod traits;

pub use dispatch::{AnyNotifier, AnyReachability, AnyStore, AnySystemControl};
pub use error::{CapabilityError, Result};
pub use jobs::{JobDispatcher, JobResources, JobStats, JobWorker, PersistenceJob, job_queue};
pub use occupancy::{Crossing, OccupancyTracker};
pub use provider::{Capabilities, CapabilityProvider, SimulationHandles};
pub use traits::{
    AttendanceStore, NetworkReachability, NotificationChannel, SwipeKind, SystemControl, TimeEntry,
};
