//! Hardware device trait definitions.
//!
//! These traits are the narrow interfaces the terminal's control loops use
//! to reach the outside world: a digital output per LED color or buzzer, a
//! digital input for the shutdown button, and a key symbol source for the
//! card reader.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT). They are
//! therefore not object-safe; dynamic choice goes through the enum wrappers
//! in [`devices`](crate::devices).

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::KeyStroke;
use attendance_core::Level;

/// A single digital output line.
///
/// # Examples
///
/// ```no_run
/// use attendance_hardware::traits::DigitalOutput;
/// use attendance_hardware::Result;
/// use attendance_core::Level;
///
/// async fn pulse<O: DigitalOutput>(out: &mut O) -> Result<()> {
///     out.configure().await?;
///     out.set(Level::High).await?;
///     out.set(Level::Low).await
/// }
/// ```
pub trait DigitalOutput: Send + Sync {
    /// Prepare the line for output. Called once before the first `set`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be claimed as an output.
    async fn configure(&mut self) -> Result<()>;

    /// Drive the line to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is gone or the write fails.
    async fn set(&mut self, level: Level) -> Result<()>;
}

/// A single digital input line.
pub trait DigitalInput: Send + Sync {
    /// Sample the line. `true` means high.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is gone or the read fails.
    async fn read(&mut self) -> Result<bool>;
}

/// A keyboard-style device producing `(symbol, transition)` pairs.
///
/// # Examples
///
/// ```no_run
/// use attendance_hardware::traits::KeySymbolSource;
/// use attendance_hardware::{KeyTransition, Result};
///
/// async fn count_presses<S: KeySymbolSource>(source: &mut S) -> Result<usize> {
///     let mut presses = 0;
///     while let Some(stroke) = source.next().await? {
///         if stroke.transition == KeyTransition::Down {
///             presses += 1;
///         }
///     }
///     Ok(presses)
/// }
/// ```
pub trait KeySymbolSource: Send + Sync {
    /// Wait for the next keystroke.
    ///
    /// Returns `Ok(None)` when the source has ended for good.
    ///
    /// # Errors
    ///
    /// Returns an error if the device failed. The caller may retry.
    async fn next(&mut self) -> Result<Option<KeyStroke>>;
}
