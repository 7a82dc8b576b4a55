//! Core constants for the attendance terminal.
//!
//! This module centralizes the card format, the default timing of every
//! control loop, and the default notification texts. Runtime values are
//! taken from [`AttendanceConfig`](crate::AttendanceConfig), which falls back
//! to the defaults defined here.
//!
//! # Timing Overview
//!
//! | Loop | Constant | Default |
//! |------|----------|---------|
//! | Indicator blink | [`DEFAULT_INDICATOR_INTERVAL_MS`] | 200ms |
//! | Indicator pause between cycles | [`DEFAULT_INDICATOR_PAUSE_MS`] | 200ms |
//! | Buzzer beep | [`DEFAULT_BUZZER_INTERVAL_MS`] | 800ms |
//! | Shutdown button poll | [`DEFAULT_SHUTDOWN_POLL_MS`] | 100ms |
//! | FSM timer tick | [`DEFAULT_TIMER_INTERVAL_MS`] | 1000ms |
//!
//! # Usage
//!
//! ```
//! use attendance_core::constants::*;
//! use std::time::Duration;
//!
//! let blink = Duration::from_millis(DEFAULT_INDICATOR_INTERVAL_MS);
//! assert_eq!(blink.as_millis(), 200);
//! assert_eq!(MAX_CARD_ID, 9_999_999);
//! ```

// ============================================================================
// Card Format
// ============================================================================

/// Number of decimal digits in a card id.
///
/// The reader types every swipe as exactly this many digit keystrokes
/// followed by the terminator key.
pub const CARD_ID_DIGITS: u32 = 7;

/// Largest representable card id (`10^7 - 1`).
pub const MAX_CARD_ID: u32 = 9_999_999;

/// Key code that ends every swipe.
///
/// The decoder only resets its digit counter on the key-up of this key.
pub const TERMINATOR_KEYCODE: &str = "KEY_ENTER";

// ============================================================================
// Pattern Driver Timing
// ============================================================================

/// Base on/off interval of the indicator LED (milliseconds).
pub const DEFAULT_INDICATOR_INTERVAL_MS: u64 = 200;

/// Pause between blink cycles when more than one blink is requested
/// (milliseconds).
pub const DEFAULT_INDICATOR_PAUSE_MS: u64 = 200;

/// Base on/off interval of the buzzer (milliseconds).
///
/// # Value: 800ms
///
/// The buzzer has always run on 800ms pulses even though older notes
/// describe 100ms beeps. The literal value is the contract.
pub const DEFAULT_BUZZER_INTERVAL_MS: u64 = 800;

// ============================================================================
// Input Timing
// ============================================================================

/// Poll interval of the shutdown button (milliseconds).
///
/// A press must be seen on two consecutive samples, one interval apart,
/// before a shutdown event is emitted.
pub const DEFAULT_SHUTDOWN_POLL_MS: u64 = 100;

/// Delay before retrying a failed card reader (milliseconds).
pub const DEFAULT_READER_RETRY_MS: u64 = 1000;

/// Interval between `Timer` events delivered to the attendance FSM
/// (milliseconds).
pub const DEFAULT_TIMER_INTERVAL_MS: u64 = 1000;

// ============================================================================
// Attendance FSM Timing
// ============================================================================

/// Pause after the startup sequence before moving to the ready state
/// (milliseconds).
pub const DEFAULT_STARTUP_SETTLE_MS: u64 = 900;

/// Artificial processing time after dispatching a swipe (milliseconds).
pub const DEFAULT_CARD_READ_SETTLE_MS: u64 = 1000;

/// Time given to the error pattern before the system powers off
/// (milliseconds).
pub const DEFAULT_SHUTDOWN_SETTLE_MS: u64 = 900;

/// Maximum number of FSM transitions kept in the context history.
pub const MAX_TRANSITION_HISTORY: usize = 100;

// ============================================================================
// Occupancy Notifications
// ============================================================================

/// Text posted when the room goes from empty to occupied.
pub const DEFAULT_OPEN_MESSAGE: &str = "LAB OPEN";

/// Text posted when the last person leaves.
pub const DEFAULT_CLOSED_MESSAGE: &str = "LAB CLOSED";

// ============================================================================
// Network Probe
// ============================================================================

/// Address probed to decide whether the terminal has network access.
pub const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:53";

/// Timeout for the network probe (milliseconds).
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;
