//! Network reachability providers.
//!
//! [`TcpReachability`] opens a TCP connection to a well-known address with
//! a timeout; success means the terminal has a route out. [`MockReachability`]
//! answers with a settable flag.

use crate::error::{CapabilityError, Result};
use crate::traits::NetworkReachability;
use attendance_core::NetworkConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// TCP connect probe.
///
/// # Example
///
/// ```no_run
/// use attendance_services::reachability::TcpReachability;
/// use attendance_services::NetworkReachability;
/// use std::time::Duration;
///
/// # async fn example() {
/// let probe = TcpReachability::new("8.8.8.8:53", Duration::from_secs(2));
/// if !probe.check().await {
///     eprintln!("offline");
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpReachability {
    target: String,
    timeout: Duration,
}

impl TcpReachability {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.probe_addr.clone(), config.probe_timeout())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Connect once and report why it failed.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityError::Unreachable` on connect failure or timeout.
    pub async fn probe(&self) -> Result<()> {
        debug!(target = %self.target, "Probing network");

        match tokio::time::timeout(self.timeout, TcpStream::connect(self.target.as_str())).await {
            Ok(Ok(_stream)) => {
                info!(target = %self.target, "Network reachable");
                Ok(())
            }
            Ok(Err(e)) => Err(CapabilityError::unreachable(&self.target, e.to_string())),
            Err(_) => Err(CapabilityError::unreachable(
                &self.target,
                format!("timed out after {}ms", self.timeout.as_millis()),
            )),
        }
    }
}

impl NetworkReachability for TcpReachability {
    async fn check(&self) -> bool {
        match self.probe().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Network check failed");
                false
            }
        }
    }
}

/// Reachability with a fixed, settable answer.
#[derive(Debug, Clone)]
pub struct MockReachability {
    reachable: Arc<AtomicBool>,
}

impl MockReachability {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: Arc::new(AtomicBool::new(reachable)),
        }
    }

    /// Change the answer. Clones share the flag.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

impl NetworkReachability for MockReachability {
    async fn check(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
