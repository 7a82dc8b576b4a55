//! Mock key symbol source for testing and development.
//!
//! Keystrokes are fed through a channel by a [`MockKeySourceHandle`], the
//! same way a card reader would type them.

use crate::{
    HardwareError, Result,
    traits::KeySymbolSource,
    types::{KeyStroke, KeySymbol},
};
use tokio::sync::mpsc;

/// Mock card reader.
///
/// The source ends (`Ok(None)`) once every handle has been dropped.
///
/// # Examples
///
/// ```
/// use attendance_hardware::mock::MockKeySource;
/// use attendance_hardware::traits::KeySymbolSource;
/// use attendance_hardware::{KeyStroke, KeySymbol};
///
/// #[tokio::main]
/// async fn main() -> attendance_hardware::Result<()> {
///     let (mut reader, handle) = MockKeySource::new();
///
///     handle.press(KeySymbol::Digit(4))?;
///     drop(handle);
///
///     assert_eq!(reader.next().await?, Some(KeyStroke::down(KeySymbol::Digit(4))));
///     assert_eq!(reader.next().await?, Some(KeyStroke::up(KeySymbol::Digit(4))));
///     assert_eq!(reader.next().await?, None);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeySource {
    input_rx: mpsc::UnboundedReceiver<Result<KeyStroke>>,
}

impl MockKeySource {
    pub fn new() -> (Self, MockKeySourceHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        (Self { input_rx }, MockKeySourceHandle { input_tx })
    }
}

impl KeySymbolSource for MockKeySource {
    async fn next(&mut self) -> Result<Option<KeyStroke>> {
        match self.input_rx.recv().await {
            Some(Ok(stroke)) => Ok(Some(stroke)),
            Some(Err(error)) => Err(error),
            None => Ok(None),
        }
    }
}

/// Handle for feeding a [`MockKeySource`]. It can be cloned and shared
/// across tasks.
#[derive(Debug, Clone)]
pub struct MockKeySourceHandle {
    input_tx: mpsc::UnboundedSender<Result<KeyStroke>>,
}

impl MockKeySourceHandle {
    /// Send one keystroke.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub fn send(&self, stroke: KeyStroke) -> Result<()> {
        self.input_tx
            .send(Ok(stroke))
            .map_err(|_| HardwareError::disconnected("Key source channel closed"))
    }

    /// Send a sequence of keystrokes.
    pub fn send_all(&self, strokes: impl IntoIterator<Item = KeyStroke>) -> Result<()> {
        strokes.into_iter().try_for_each(|stroke| self.send(stroke))
    }

    /// Press and release one key.
    pub fn press(&self, symbol: KeySymbol) -> Result<()> {
        self.send_all(KeyStroke::press(symbol))
    }

    /// Type a full swipe: the digits followed by the terminator.
    pub fn swipe(&self, digits: &str) -> Result<()> {
        self.send_all(KeyStroke::swipe(digits))
    }

    /// Make the next read fail with `error`.
    pub fn fail(&self, error: HardwareError) -> Result<()> {
        self.input_tx
            .send(Err(error))
            .map_err(|_| HardwareError::disconnected("Key source channel closed"))
    }
}
