//! Hardware abstraction layer for the attendance terminal.
//!
//! This crate provides trait-based abstractions for the terminal's
//! peripherals (LED and buzzer output lines, the shutdown button, and the
//! keyboard-style card reader) together with the two input producers built
//! on top of them:
//!
//! - [`card_reader`]: folds the reader's keystrokes into card ids and posts
//!   `CardRead` events.
//! - [`shutdown`]: a two-sample debouncer for the active-low shutdown
//!   button that posts `Shutdown` events.
//!
//! # Layout
//!
//! Device traits use native `async fn` and so are not object-safe. Tasks hold
//! the [`devices`] enums instead. Each trait has a handle-driven mock in
//! [`mock`]; the simulated capability provider wires those mocks into a full
//! terminal.
//!
//! # Card Reader
//!
//! ```
//! use attendance_hardware::card_reader::CardDecoder;
//! use attendance_hardware::KeyStroke;
//!
//! let mut decoder = CardDecoder::new();
//! let ids: Vec<_> = KeyStroke::swipe("0012345")
//!     .iter()
//!     .filter_map(|stroke| decoder.feed(stroke))
//!     .collect();
//!
//! assert_eq!(ids[0].to_string(), "0012345");
//! ```
//!
//! # Producer Tasks
//!
//! ```no_run
//! use attendance_hardware::manager::{InputConfig, InputManager};
//! use attendance_hardware::mock::{MockInput, MockKeySource};
//! use attendance_core::queue;
//!
//! # async fn example() -> attendance_hardware::Result<()> {
//! let (events_tx, _events_rx) = queue::channel();
//! let mut manager = InputManager::new(InputConfig::default(), events_tx);
//!
//! let (reader, reader_handle) = MockKeySource::new();
//! let (button, _button_handle) = MockInput::new(true);
//! manager.register_key_source(reader.into());
//! manager.register_shutdown_input(button.into());
//!
//! let handle = manager.start();
//! reader_handle.swipe("1234567")?;
//! handle.shutdown().await
//! # }
//! ```

pub mod card_reader;
pub mod devices;
pub mod error;
pub mod manager;
pub mod mock;
pub mod shutdown;
pub mod traits;
pub mod types;

pub use devices::{AnyDigitalInput, AnyDigitalOutput, AnyKeySource};
pub use error::{HardwareError, Result};
pub use traits::{DigitalInput, DigitalOutput, KeySymbolSource};
pub use types::{KeyStroke, KeySymbol, KeyTransition};
