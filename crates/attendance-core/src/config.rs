//! Runtime configuration for the attendance terminal.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working configuration. Partial files only override what they
//! name:
//!
//! ```
//! use attendance_core::{AttendanceConfig, ProviderKind};
//!
//! let config = AttendanceConfig::from_json_str(r#"{
//!     "provider": "host",
//!     "timing": { "timer_interval_ms": 500 }
//! }"#).unwrap();
//!
//! assert_eq!(config.provider, ProviderKind::Host);
//! assert_eq!(config.timing.timer_interval_ms, 500);
//! assert_eq!(config.timing.indicator_interval_ms, 200);
//! ```

use crate::{
    Result,
    constants::*,
    error::Error,
    types::{OutputSelector, PatternRequest},
};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, time::Duration};

/// Which set of capability providers the binary wires up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Mock devices, always-reachable network, shutdown only logged.
    #[default]
    Simulated,

    /// TCP network probe and a real shutdown command.
    Host,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderKind::Simulated => write!(f, "simulated"),
            ProviderKind::Host => write!(f, "host"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simulated" => Ok(ProviderKind::Simulated),
            "host" => Ok(ProviderKind::Host),
            other => Err(Error::Config(format!("Unknown provider: {other}"))),
        }
    }
}

/// Intervals of every timed loop, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub indicator_interval_ms: u64,
    pub indicator_pause_ms: u64,
    pub buzzer_interval_ms: u64,
    pub shutdown_poll_ms: u64,
    pub timer_interval_ms: u64,
    pub startup_settle_ms: u64,
    pub card_read_settle_ms: u64,
    pub shutdown_settle_ms: u64,
    pub reader_retry_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            indicator_interval_ms: DEFAULT_INDICATOR_INTERVAL_MS,
            indicator_pause_ms: DEFAULT_INDICATOR_PAUSE_MS,
            buzzer_interval_ms: DEFAULT_BUZZER_INTERVAL_MS,
            shutdown_poll_ms: DEFAULT_SHUTDOWN_POLL_MS,
            timer_interval_ms: DEFAULT_TIMER_INTERVAL_MS,
            startup_settle_ms: DEFAULT_STARTUP_SETTLE_MS,
            card_read_settle_ms: DEFAULT_CARD_READ_SETTLE_MS,
            shutdown_settle_ms: DEFAULT_SHUTDOWN_SETTLE_MS,
            reader_retry_ms: DEFAULT_READER_RETRY_MS,
        }
    }
}

impl TimingConfig {
    pub fn indicator_interval(&self) -> Duration {
        Duration::from_millis(self.indicator_interval_ms)
    }

    pub fn indicator_pause(&self) -> Duration {
        Duration::from_millis(self.indicator_pause_ms)
    }

    pub fn buzzer_interval(&self) -> Duration {
        Duration::from_millis(self.buzzer_interval_ms)
    }

    pub fn shutdown_poll(&self) -> Duration {
        Duration::from_millis(self.shutdown_poll_ms)
    }

    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms)
    }

    pub fn startup_settle(&self) -> Duration {
        Duration::from_millis(self.startup_settle_ms)
    }

    pub fn card_read_settle(&self) -> Duration {
        Duration::from_millis(self.card_read_settle_ms)
    }

    pub fn shutdown_settle(&self) -> Duration {
        Duration::from_millis(self.shutdown_settle_ms)
    }

    pub fn reader_retry(&self) -> Duration {
        Duration::from_millis(self.reader_retry_ms)
    }

    fn named(&self) -> [(&'static str, u64); 9] {
        [
            ("indicator_interval_ms", self.indicator_interval_ms),
            ("indicator_pause_ms", self.indicator_pause_ms),
            ("buzzer_interval_ms", self.buzzer_interval_ms),
            ("shutdown_poll_ms", self.shutdown_poll_ms),
            ("timer_interval_ms", self.timer_interval_ms),
            ("startup_settle_ms", self.startup_settle_ms),
            ("card_read_settle_ms", self.card_read_settle_ms),
            ("shutdown_settle_ms", self.shutdown_settle_ms),
            ("reader_retry_ms", self.reader_retry_ms),
        ]
    }
}

/// Named feedback patterns requested by the attendance FSM and jobs.
///
/// Indicator selectors index the red/green/blue LED outputs. Beep entries
/// always target the single buzzer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternCatalog {
    /// Shown while the terminal waits for swipes.
    pub ready: PatternRequest,

    /// Shown while the terminal boots.
    pub startup: PatternRequest,

    /// Network unreachable or shutdown in progress.
    pub error: PatternRequest,

    pub signed_in: PatternRequest,
    pub signed_out: PatternRequest,

    /// The attendance store rejected a swipe.
    pub write_failed: PatternRequest,

    pub signed_in_beep: PatternRequest,
    pub signed_out_beep: PatternRequest,
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self {
            ready: PatternRequest::solid(OutputSelector::GREEN),
            startup: PatternRequest::new(OutputSelector::BLUE, 1),
            error: PatternRequest::new(OutputSelector::RED, 3),
            signed_in: PatternRequest::new(OutputSelector::GREEN, 2),
            signed_out: PatternRequest::new(OutputSelector::BLUE, 2),
            write_failed: PatternRequest::new(OutputSelector::RED, 1),
            signed_in_beep: PatternRequest::new(OutputSelector::BUZZER, 1),
            signed_out_beep: PatternRequest::new(OutputSelector::BUZZER, 2),
        }
    }
}

/// Texts posted on occupancy threshold crossings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyConfig {
    pub open_message: String,
    pub closed_message: String,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            open_message: DEFAULT_OPEN_MESSAGE.to_string(),
            closed_message: DEFAULT_CLOSED_MESSAGE.to_string(),
        }
    }
}

/// Network reachability probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// `host:port` opened with a TCP connect to test connectivity.
    pub probe_addr: String,
    pub probe_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl NetworkConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Host integration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Program and arguments run to power the host off.
    pub shutdown_command: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            shutdown_command: vec!["sudo".into(), "shutdown".into(), "now".into()],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    pub provider: ProviderKind,
    pub timing: TimingConfig,
    pub patterns: PatternCatalog,
    pub occupancy: OccupancyConfig,
    pub network: NetworkConfig,
    pub system: SystemConfig,
}

impl AttendanceConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AttendanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the capability provider.
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Replace the timing section.
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Check the configuration for values no loop can run with.
    ///
    /// # Errors
    /// Returns `Error::Config` for a zero interval, an empty shutdown command
    /// or an empty probe address.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.timing.named() {
            if value == 0 {
                return Err(Error::Config(format!("timing.{name} must be greater than 0")));
            }
        }

        if self.network.probe_timeout_ms == 0 {
            return Err(Error::Config(
                "network.probe_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.network.probe_addr.trim().is_empty() {
            return Err(Error::Config("network.probe_addr is empty".to_string()));
        }

        match self.system.shutdown_command.first() {
            Some(program) if !program.trim().is_empty() => Ok(()),
            _ => Err(Error::Config(
                "system.shutdown_command needs a program".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = AttendanceConfig::default();

        assert_eq!(config.provider, ProviderKind::Simulated);
        assert_eq!(config.timing.indicator_interval(), Duration::from_millis(200));
        assert_eq!(config.timing.buzzer_interval(), Duration::from_millis(800));
        assert_eq!(config.timing.shutdown_poll(), Duration::from_millis(100));
        assert_eq!(config.patterns.ready, PatternRequest::solid(OutputSelector::GREEN));
        assert_eq!(config.patterns.error.repeat_count, 3);
        assert_eq!(config.occupancy.open_message, "LAB OPEN");
        assert_eq!(config.occupancy.closed_message, "LAB CLOSED");
        assert_eq!(config.system.shutdown_command, ["sudo", "shutdown", "now"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = AttendanceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AttendanceConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AttendanceConfig::from_json_str(
            r#"{
                "occupancy": { "open_message": "ROOM OPEN" },
                "patterns": { "ready": { "selector": 2, "repeat_count": 0 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.occupancy.open_message, "ROOM OPEN");
        assert_eq!(config.occupancy.closed_message, "LAB CLOSED");
        assert_eq!(config.patterns.ready.selector, OutputSelector::BLUE);
        assert_eq!(config.patterns.startup, PatternCatalog::default().startup);
    }

    #[rstest]
    #[case(r#"{"timing": {"indicator_interval_ms": 0}}"#)]
    #[case(r#"{"timing": {"shutdown_poll_ms": 0}}"#)]
    #[case(r#"{"network": {"probe_timeout_ms": 0}}"#)]
    #[case(r#"{"network": {"probe_addr": " "}}"#)]
    #[case(r#"{"system": {"shutdown_command": []}}"#)]
    fn test_invalid_configs_rejected(#[case] json: &str) {
        assert!(matches!(
            AttendanceConfig::from_json_str(json),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AttendanceConfig::from_json_str("{ not json"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AttendanceConfig::from_file("/nonexistent/attendance.json"),
            Err(Error::Io(_))
        ));
    }

    #[rstest]
    #[case("simulated", ProviderKind::Simulated)]
    #[case("HOST", ProviderKind::Host)]
    fn test_provider_from_str(#[case] text: &str, #[case] expected: ProviderKind) {
        assert_eq!(text.parse::<ProviderKind>().unwrap(), expected);
    }

    #[test]
    fn test_builder() {
        let timing = TimingConfig {
            timer_interval_ms: 10,
            ..TimingConfig::default()
        };
        let config = AttendanceConfig::default()
            .provider(ProviderKind::Host)
            .timing(timing);

        assert_eq!(config.provider, ProviderKind::Host);
        assert_eq!(config.timing.timer_interval(), Duration::from_millis(10));
    }
}
