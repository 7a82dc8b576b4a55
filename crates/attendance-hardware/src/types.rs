//! Keystroke types produced by key symbol sources.

use attendance_core::constants::TERMINATOR_KEYCODE;
use std::fmt;

/// A key as reported by a keyboard-style device.
///
/// The card reader types swipes as `KEY_0`..`KEY_9` followed by
/// `KEY_ENTER`. Anything else is kept as [`KeySymbol::Other`] so the decoder
/// can ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySymbol {
    /// Digit key, value 0-9.
    Digit(u8),

    /// The terminator key that ends every swipe.
    Enter,

    /// Any other key code.
    Other(String),
}

impl KeySymbol {
    /// Map a raw key code (`KEY_5`, `KEY_ENTER`, ...) to a symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_hardware::KeySymbol;
    ///
    /// assert_eq!(KeySymbol::from_keycode("KEY_5"), KeySymbol::Digit(5));
    /// assert_eq!(KeySymbol::from_keycode("KEY_ENTER"), KeySymbol::Enter);
    /// assert!(matches!(KeySymbol::from_keycode("KEY_KP5"), KeySymbol::Other(_)));
    /// ```
    pub fn from_keycode(code: &str) -> Self {
        if code == TERMINATOR_KEYCODE {
            return KeySymbol::Enter;
        }

        match code.strip_prefix("KEY_").map(str::as_bytes) {
            Some([d @ b'0'..=b'9']) => KeySymbol::Digit(d - b'0'),
            _ => KeySymbol::Other(code.to_string()),
        }
    }

    /// Digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            KeySymbol::Digit(d) if *d <= 9 => Some(*d),
            _ => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, KeySymbol::Enter)
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeySymbol::Digit(d) => write!(f, "KEY_{d}"),
            KeySymbol::Enter => f.write_str(TERMINATOR_KEYCODE),
            KeySymbol::Other(code) => f.write_str(code),
        }
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTransition {
    Down,
    Up,
}

/// One `(symbol, transition)` pair from a key source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub symbol: KeySymbol,
    pub transition: KeyTransition,
}

impl KeyStroke {
    pub fn new(symbol: KeySymbol, transition: KeyTransition) -> Self {
        Self { symbol, transition }
    }

    pub fn down(symbol: KeySymbol) -> Self {
        Self::new(symbol, KeyTransition::Down)
    }

    pub fn up(symbol: KeySymbol) -> Self {
        Self::new(symbol, KeyTransition::Up)
    }

    /// Down/up pair for one key press.
    pub fn press(symbol: KeySymbol) -> [KeyStroke; 2] {
        [Self::down(symbol.clone()), Self::up(symbol)]
    }

    /// Keystrokes a card reader types for a swipe: each digit pressed and
    /// released, then the terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_hardware::{KeyStroke, KeySymbol};
    ///
    /// let strokes = KeyStroke::swipe("0042");
    /// assert_eq!(strokes.len(), 10);
    /// assert_eq!(strokes[8], KeyStroke::down(KeySymbol::Enter));
    /// ```
    pub fn swipe(digits: &str) -> Vec<KeyStroke> {
        digits
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => KeySymbol::Digit(d as u8),
                None => KeySymbol::Other(c.to_string()),
            })
            .chain(std::iter::once(KeySymbol::Enter))
            .flat_map(Self::press)
            .collect()
    }
}
