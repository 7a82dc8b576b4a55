//! Feedback pattern drivers for the attendance terminal.
//!
//! Two instances of the same driver render the FSM's feedback requests:
//!
//! - **Indicator**: a tri-color LED. Requests pick a color and a blink
//!   count; the pattern repeats until the next request arrives.
//! - **Buzzer**: a piezo. Requests give a beep count; after the last beep
//!   the driver goes idle until the next request.
//!
//! The pattern logic lives in the pure [`PatternMachine`]; the async
//! [`PatternDriver`] owns the output lines, applies each [`Step`], sleeps,
//! and handles preemption.
//!
//! # Examples
//!
//! ```no_run
//! use attendance_feedback::{PatternDriver, PatternProfile};
//! use attendance_core::{OutputSelector, PatternRequest, TimingConfig, queue};
//! use attendance_hardware::mock::MockOutput;
//!
//! # async fn example() {
//! let (requests_tx, requests_rx) = queue::channel();
//! let outputs = ["red", "green", "blue"]
//!     .into_iter()
//!     .map(|name| MockOutput::new(name).0.into())
//!     .collect();
//!
//! let driver = PatternDriver::new(
//!     PatternProfile::indicator(&TimingConfig::default()),
//!     outputs,
//!     requests_rx,
//! );
//! tokio::spawn(driver.run());
//!
//! requests_tx.put(PatternRequest::new(OutputSelector::GREEN, 2)).unwrap();
//! # }
//! ```

pub mod driver;
pub mod machine;
pub mod profile;

pub use driver::PatternDriver;
pub use machine::{OutputAction, PatternDefect, PatternMachine, PatternState, Step};
pub use profile::{DriverKind, PatternProfile};
