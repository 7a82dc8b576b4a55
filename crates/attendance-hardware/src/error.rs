//! Errors raised by pins and key sources.

pub type Result<T> = std::result::Result<T, HardwareError>;

/// Failures of a GPIO line or a card reader.
///
/// None of these stop a task: the card reader retries after a delay and the
/// debouncer treats a failed read as "not pressed".
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device vanished (unplugged reader, released line).
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A read from a present device failed.
    #[error("Read failed on {device}: {message}")]
    ReadFailed { device: String, message: String },

    /// Used before `configure`, or configured with the wrong direction.
    #[error("Line not configured: {message}")]
    ConfigurationError { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn read_failed(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            device: device.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// A disconnected device may come back; anything else is a wiring or
    /// device fault that retrying will not fix.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
