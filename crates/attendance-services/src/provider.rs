//! Capability provider selection.
//!
//! The provider is chosen once at startup from [`AttendanceConfig::provider`].
//! Everything downstream receives concrete capabilities and never asks which
//! provider built them.

use crate::dispatch::{AnyNotifier, AnyReachability, AnyStore, AnySystemControl};
use crate::error::Result;
use crate::notify::LogNotifier;
use crate::reachability::{MockReachability, TcpReachability};
use crate::store::MemoryStore;
use crate::system::{CommandShutdown, MockShutdown};
use attendance_core::{AttendanceConfig, ProviderKind};
use attendance_hardware::mock::{
    MockInput, MockInputHandle, MockKeySource, MockKeySourceHandle, MockOutput, MockOutputHandle,
};
use attendance_hardware::{AnyDigitalInput, AnyDigitalOutput, AnyKeySource};
use std::sync::Arc;
use tracing::info;

/// Names of the indicator outputs, in selector order.
pub const INDICATOR_OUTPUTS: [&str; 3] = ["red", "green", "blue"];

/// Handles onto the simulated devices.
///
/// Dropping `keys` ends the card reader's input stream, so hold on to it for
/// as long as the reader should run.
#[derive(Debug)]
pub struct SimulationHandles {
    pub keys: MockKeySourceHandle,
    pub button: MockInputHandle,
    pub indicator: Vec<MockOutputHandle>,
    pub buzzer: MockOutputHandle,
}

/// Every device and capability the terminal needs.
#[derive(Debug)]
pub struct Capabilities {
    pub provider: ProviderKind,
    pub indicator_outputs: Vec<AnyDigitalOutput>,
    pub buzzer_output: AnyDigitalOutput,
    pub shutdown_input: AnyDigitalInput,
    pub key_source: AnyKeySource,
    pub reachability: AnyReachability,
    pub notifier: AnyNotifier,
    pub system: AnySystemControl,
    pub store: Arc<AnyStore>,
    pub simulation: SimulationHandles,
}

pub struct CapabilityProvider;

impl CapabilityProvider {
    /// Build the capabilities for the configured provider.
    ///
    /// Both providers drive mock GPIO and key devices; `host` swaps in the
    /// real network probe and the real shutdown command.
    ///
    /// # Errors
    ///
    /// Returns an error if the host shutdown command is empty.
    pub fn build(config: &AttendanceConfig) -> Result<Capabilities> {
        let mut indicator_outputs = Vec::with_capacity(INDICATOR_OUTPUTS.len());
        let mut indicator_handles = Vec::with_capacity(INDICATOR_OUTPUTS.len());
        for name in INDICATOR_OUTPUTS {
            let (output, handle) = MockOutput::new(name);
            indicator_outputs.push(output.into());
            indicator_handles.push(handle);
        }
        let (buzzer, buzzer_handle) = MockOutput::new("buzzer");
        // Active-low button, released.
        let (button, button_handle) = MockInput::new(true);
        let (keys, keys_handle) = MockKeySource::new();

        let (reachability, system): (AnyReachability, AnySystemControl) = match config.provider {
            ProviderKind::Simulated => (
                MockReachability::new(true).into(),
                MockShutdown::new().into(),
            ),
            ProviderKind::Host => (
                TcpReachability::from_config(&config.network).into(),
                CommandShutdown::new(&config.system.shutdown_command)?.into(),
            ),
        };

        info!(provider = %config.provider, "Capabilities built");

        Ok(Capabilities {
            provider: config.provider,
            indicator_outputs,
            buzzer_output: buzzer.into(),
            shutdown_input: button.into(),
            key_source: keys.into(),
            reachability,
            notifier: LogNotifier.into(),
            system,
            store: Arc::new(MemoryStore::new().into()),
            simulation: SimulationHandles {
                keys: keys_handle,
                button: button_handle,
                indicator: indicator_handles,
                buzzer: buzzer_handle,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_provider() {
        let caps = CapabilityProvider::build(&AttendanceConfig::default()).unwrap();

        assert_eq!(caps.provider, ProviderKind::Simulated);
        assert_eq!(caps.indicator_outputs.len(), 3);
        assert!(matches!(caps.reachability, AnyReachability::Mock(_)));
        assert!(matches!(caps.system, AnySystemControl::Mock(_)));
        assert_eq!(caps.simulation.indicator[1].name(), "green");
    }

    #[test]
    fn test_host_provider() {
        let config = AttendanceConfig::default().provider(ProviderKind::Host);
        let caps = CapabilityProvider::build(&config).unwrap();

        assert!(matches!(caps.reachability, AnyReachability::Tcp(_)));
        assert!(matches!(caps.system, AnySystemControl::Command(_)));
    }

    #[test]
    fn test_host_provider_rejects_empty_command() {
        let mut config = AttendanceConfig::default().provider(ProviderKind::Host);
        config.system.shutdown_command.clear();
        assert!(CapabilityProvider::build(&config).is_err());
    }
}
