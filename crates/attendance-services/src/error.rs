use thiserror::Error;

/// Failures of the external capabilities the terminal calls.
///
/// These are caught where the capability is called, logged, and turned into
/// a fallback (usually an error pattern). They never stop a task loop.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Network probe failed
    #[error("Network unreachable ({target}): {reason}")]
    Unreachable { target: String, reason: String },

    /// Notification could not be delivered
    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    /// Attendance store rejected an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Shutdown command failed or exited unsuccessfully
    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    /// The job worker is gone
    #[error("Job dispatch closed: no worker is running")]
    DispatchClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CapabilityError {
    pub fn unreachable(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CapabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CapabilityError::unreachable("8.8.8.8:53", "timed out after 2000ms");
        assert_eq!(
            error.to_string(),
            "Network unreachable (8.8.8.8:53): timed out after 2000ms"
        );
        assert_eq!(
            CapabilityError::DispatchClosed.to_string(),
            "Job dispatch closed: no worker is running"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "sudo: not found");
        let error: CapabilityError = io.into();
        assert!(matches!(error, CapabilityError::Io(_)));
    }
}
