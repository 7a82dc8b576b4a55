//! Host power control providers.

use crate::error::{CapabilityError, Result};
use crate::traits::SystemControl;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::process::Command;
use tracing::{error, info, warn};

/// Runs a configured command (by default `sudo shutdown now`).
#[derive(Debug, Clone)]
pub struct CommandShutdown {
    program: String,
    args: Vec<String>,
}

impl CommandShutdown {
    /// Build from a `[program, args...]` list.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::ShutdownFailed` if the list is empty.
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CapabilityError::ShutdownFailed("empty shutdown command".into()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SystemControl for CommandShutdown {
    async fn shutdown_now(&self) -> Result<()> {
        warn!(program = %self.program, args = ?self.args, "System shutting down");

        let status = Command::new(&self.program).args(&self.args).status().await?;
        if status.success() {
            Ok(())
        } else {
            error!(%status, "Shutdown command failed");
            Err(CapabilityError::ShutdownFailed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}

/// Counts shutdown requests instead of powering off. Clones share the
/// count.
#[derive(Debug, Clone, Default)]
pub struct MockShutdown {
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockShutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `shutdown_now` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl SystemControl for MockShutdown {
    async fn shutdown_now(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CapabilityError::ShutdownFailed("mock shutdown refused".into()));
        }
        info!("Shutdown requested, simulated host stays up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_requires_program() {
        assert!(CommandShutdown::new(&[]).is_err());

        let command = vec!["sudo".to_string(), "shutdown".to_string(), "now".to_string()];
        let shutdown = CommandShutdown::new(&command).unwrap();
        assert_eq!(shutdown.program(), "sudo");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_exit_status() {
        let ok = CommandShutdown::new(&["true".to_string()]).unwrap();
        assert!(ok.shutdown_now().await.is_ok());

        let failed = CommandShutdown::new(&["false".to_string()]).unwrap();
        assert!(matches!(
            failed.shutdown_now().await,
            Err(CapabilityError::ShutdownFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let missing = CommandShutdown::new(&["/nonexistent/shutdown".to_string()]).unwrap();
        assert!(matches!(
            missing.shutdown_now().await,
            Err(CapabilityError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockShutdown::new();
        let observer = mock.clone();

        mock.shutdown_now().await.unwrap();
        mock.set_failing(true);
        assert!(mock.shutdown_now().await.is_err());

        assert_eq!(observer.calls(), 2);
    }
}
