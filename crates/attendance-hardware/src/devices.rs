//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits is not object-safe, so a `Box<dyn
//! DigitalOutput>` is not possible. These enums give the rest of the
//! terminal one concrete type per device kind while keeping the trait as the
//! contract. A task spawned with an `Any*` device gets a `Send` future
//! because every variant is a concrete type.
//!
//! # Examples
//!
//! ```
//! use attendance_hardware::devices::AnyDigitalOutput;
//! use attendance_hardware::mock::MockOutput;
//!
//! let (led, _handle) = MockOutput::new("green");
//! let any_led = AnyDigitalOutput::Mock(led);
//! ```

use crate::mock::{MockInput, MockKeySource, MockOutput};
use crate::traits::{DigitalInput, DigitalOutput, KeySymbolSource};
use crate::{KeyStroke, Result};
use attendance_core::Level;

/// Enum wrapper for digital output dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDigitalOutput {
    /// Mock output for development and testing.
    Mock(MockOutput),
}

impl DigitalOutput for AnyDigitalOutput {
    async fn configure(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.configure().await,
        }
    }

    async fn set(&mut self, level: Level) -> Result<()> {
        match self {
            Self::Mock(device) => device.set(level).await,
        }
    }
}

impl From<MockOutput> for AnyDigitalOutput {
    fn from(device: MockOutput) -> Self {
        Self::Mock(device)
    }
}

/// Enum wrapper for digital input dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDigitalInput {
    /// Mock input for development and testing.
    Mock(MockInput),
}

impl DigitalInput for AnyDigitalInput {
    async fn read(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.read().await,
        }
    }
}

impl From<MockInput> for AnyDigitalInput {
    fn from(device: MockInput) -> Self {
        Self::Mock(device)
    }
}

/// Enum wrapper for key symbol source dispatch.
///
/// # Examples
///
/// ```
/// use attendance_hardware::devices::AnyKeySource;
/// use attendance_hardware::traits::KeySymbolSource;
/// use attendance_hardware::mock::MockKeySource;
///
/// #[tokio::main]
/// async fn main() -> attendance_hardware::Result<()> {
///     let (reader, handle) = MockKeySource::new();
///     let mut any_reader = AnyKeySource::Mock(reader);
///
///     drop(handle);
///     assert!(any_reader.next().await?.is_none());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeySource {
    /// Mock key source for development and testing.
    Mock(MockKeySource),
}

impl KeySymbolSource for AnyKeySource {
    async fn next(&mut self) -> Result<Option<KeyStroke>> {
        match self {
            Self::Mock(device) => device.next().await,
        }
    }
}

impl From<MockKeySource> for AnyKeySource {
    fn from(device: MockKeySource) -> Self {
        Self::Mock(device)
    }
}
