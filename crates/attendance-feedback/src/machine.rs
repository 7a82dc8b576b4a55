//! Pure pattern state machine.
//!
//! # States
//!
//! - `Init`: reset the pulse counter, drive every output to its quiescent
//!   level
//! - `On`: drive the selected output active for one base interval
//! - `Off`: drive it quiescent for one base interval and count the pulse
//! - `Waiting`: pause between blink cycles (indicator only)
//!
//! # Transitions
//!
//! ```text
//! Init ──► On ──► Off ──► On        count < repeat_count
//!          ▲ │          ├► On       repeat_count == 1 (indicator, toggle forever)
//!          └─┘          ├► Waiting  repeat_count > 1 (indicator) ──► On
//!    repeat_count == 0  └► done     buzzer, all pulses rendered
//! ```
//!
//! The machine performs no I/O and never sleeps; each [`Step`] tells the
//! driver what to write and how long to hold it.
//!
//! # Examples
//!
//! ```
//! use attendance_feedback::{PatternMachine, PatternProfile, PatternState};
//! use attendance_core::{OutputSelector, PatternRequest, TimingConfig};
//!
//! let profile = PatternProfile::buzzer(&TimingConfig::default());
//! let mut machine = PatternMachine::new(profile, PatternRequest::new(OutputSelector::BUZZER, 1));
//!
//! let init = machine.step(PatternState::Init).unwrap();
//! let on = machine.step(init.next.unwrap()).unwrap();
//! let off = machine.step(on.next.unwrap()).unwrap();
//! assert_eq!(off.next, None);
//! ```

use crate::profile::{DriverKind, PatternProfile};
use attendance_core::{OutputSelector, PatternRequest};
use std::fmt;
use std::time::Duration;

/// Phase of a pattern rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternState {
    Init,
    On,
    Off,
    Waiting,
}

impl fmt::Display for PatternState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            PatternState::Init => "init",
            PatternState::On => "on",
            PatternState::Off => "off",
            PatternState::Waiting => "waiting",
        };
        write!(f, "{state_str}")
    }
}

/// Output write requested by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    /// Drive every output quiescent.
    QuiesceAll,
    /// Drive one output active.
    Assert(OutputSelector),
    /// Drive one output quiescent.
    Deassert(OutputSelector),
    /// Leave outputs untouched.
    Hold,
}

/// Result of running one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub action: OutputAction,

    /// How long to hold after the action before the next step.
    pub delay: Duration,

    /// `None` when the pattern has finished (buzzer only).
    pub next: Option<PatternState>,
}

/// A state the machine cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternDefect {
    #[error("{kind} driver has no {state} state")]
    InvalidState { kind: DriverKind, state: PatternState },

    #[error("{kind} driver has no output {selector}")]
    UnknownSelector {
        kind: DriverKind,
        selector: OutputSelector,
    },
}

/// Renders one [`PatternRequest`] as a sequence of [`Step`]s.
#[derive(Debug, Clone)]
pub struct PatternMachine {
    profile: PatternProfile,
    request: PatternRequest,
    pulses: u32,
}

impl PatternMachine {
    pub fn new(profile: PatternProfile, request: PatternRequest) -> Self {
        Self {
            profile,
            request,
            pulses: 0,
        }
    }

    pub fn request(&self) -> PatternRequest {
        self.request
    }

    pub fn profile(&self) -> &PatternProfile {
        &self.profile
    }

    /// Pulses completed in the current cycle.
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    fn selector(&self) -> Result<OutputSelector, PatternDefect> {
        let selector = self.request.selector;
        if selector.index() < self.profile.outputs {
            Ok(selector)
        } else {
            Err(PatternDefect::UnknownSelector {
                kind: self.profile.kind,
                selector,
            })
        }
    }

    /// Run `state` once.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternDefect`] if the request targets an output the
    /// profile does not have, or the state does not exist for this kind.
    pub fn step(&mut self, state: PatternState) -> Result<Step, PatternDefect> {
        let base = self.profile.base_interval;
        let repeat_count = self.request.repeat_count;

        match (self.profile.kind, state) {
            (_, PatternState::Init) => {
                self.pulses = 0;
                Ok(Step {
                    action: OutputAction::QuiesceAll,
                    delay: Duration::ZERO,
                    next: Some(PatternState::On),
                })
            }

            (DriverKind::Indicator, PatternState::On) => {
                let selector = self.selector()?;
                let next = if repeat_count == 0 {
                    PatternState::On
                } else {
                    PatternState::Off
                };
                Ok(Step {
                    action: OutputAction::Assert(selector),
                    delay: base,
                    next: Some(next),
                })
            }

            (DriverKind::Buzzer, PatternState::On) => {
                let selector = self.selector()?;
                Ok(Step {
                    action: OutputAction::Assert(selector),
                    delay: base,
                    next: Some(PatternState::Off),
                })
            }

            (DriverKind::Indicator, PatternState::Off) => {
                let selector = self.selector()?;
                self.pulses += 1;
                let next = if self.pulses < repeat_count {
                    PatternState::On
                } else if repeat_count == 1 {
                    self.pulses = 0;
                    PatternState::On
                } else {
                    self.pulses = 0;
                    PatternState::Waiting
                };
                Ok(Step {
                    action: OutputAction::Deassert(selector),
                    delay: base,
                    next: Some(next),
                })
            }

            (DriverKind::Buzzer, PatternState::Off) => {
                let selector = self.selector()?;
                self.pulses += 1;
                let next = if self.pulses < repeat_count {
                    Some(PatternState::On)
                } else {
                    self.pulses = 0;
                    None
                };
                Ok(Step {
                    action: OutputAction::Deassert(selector),
                    delay: base,
                    next,
                })
            }

            (DriverKind::Indicator, PatternState::Waiting) => Ok(Step {
                action: OutputAction::Hold,
                delay: self.profile.pause,
                next: Some(PatternState::On),
            }),

            (kind @ DriverKind::Buzzer, state @ PatternState::Waiting) => {
                Err(PatternDefect::InvalidState { kind, state })
            }
        }
    }
}
