//! Mock device implementations for testing and simulation.
//!
//! Each mock is created together with a handle that tests (or the simulated
//! capability provider) use to drive or inspect it without physical
//! hardware.

pub mod input;
pub mod key_source;
pub mod output;

pub use input::{MockInput, MockInputHandle};
pub use key_source::{MockKeySource, MockKeySourceHandle};
pub use output::{MockOutput, MockOutputHandle};
