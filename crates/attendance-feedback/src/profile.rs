use attendance_core::{Level, TimingConfig};
use std::fmt;
use std::time::Duration;

/// Which of the two feedback devices a driver renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// Tri-color LED. Holds levels, blinks forever until preempted.
    Indicator,

    /// Piezo buzzer. Pulses a finite number of times, then idles.
    Buzzer,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriverKind::Indicator => write!(f, "indicator"),
            DriverKind::Buzzer => write!(f, "buzzer"),
        }
    }
}

/// Electrical and timing parameters of a pattern driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternProfile {
    pub kind: DriverKind,

    /// Number of output lines, indexed by `OutputSelector`.
    pub outputs: usize,

    /// Level that turns an output on.
    pub active_level: Level,

    /// On and off time of one pulse.
    pub base_interval: Duration,

    /// Pause between blink cycles (indicator only).
    pub pause: Duration,
}

impl PatternProfile {
    /// Red/green/blue LED, wired active-low.
    pub fn indicator(timing: &TimingConfig) -> Self {
        Self {
            kind: DriverKind::Indicator,
            outputs: 3,
            active_level: Level::Low,
            base_interval: timing.indicator_interval(),
            pause: timing.indicator_pause(),
        }
    }

    /// Single buzzer line, wired active-high.
    pub fn buzzer(timing: &TimingConfig) -> Self {
        Self {
            kind: DriverKind::Buzzer,
            outputs: 1,
            active_level: Level::High,
            base_interval: timing.buzzer_interval(),
            pause: timing.buzzer_interval(),
        }
    }

    /// Level that turns an output off.
    pub fn quiescent_level(&self) -> Level {
        self.active_level.inverted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles() {
        let timing = TimingConfig::default();

        let indicator = PatternProfile::indicator(&timing);
        assert_eq!(indicator.outputs, 3);
        assert_eq!(indicator.quiescent_level(), Level::High);
        assert_eq!(indicator.base_interval, Duration::from_millis(200));
        assert_eq!(indicator.pause, Duration::from_millis(200));

        let buzzer = PatternProfile::buzzer(&timing);
        assert_eq!(buzzer.outputs, 1);
        assert_eq!(buzzer.quiescent_level(), Level::Low);
        assert_eq!(buzzer.base_interval, Duration::from_millis(800));
    }
}
