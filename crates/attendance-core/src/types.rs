use crate::{
    Result,
    constants::{CARD_ID_DIGITS, MAX_CARD_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card id decoded from a swipe (7 decimal digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CardId(u32);

impl CardId {
    /// Create a new card id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardId` if the id does not fit in 7 digits.
    pub fn new(id: u32) -> Result<Self> {
        if id > MAX_CARD_ID {
            return Err(Error::InvalidCardId(format!(
                "Card id must be at most {CARD_ID_DIGITS} digits, got {id}"
            )));
        }
        Ok(CardId(id))
    }

    /// Get the raw card id.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Format the card id zero-padded to 7 digits.
    #[must_use]
    pub fn padded(&self) -> String {
        format!("{:07}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:07}", self.0)
    }
}

impl std::str::FromStr for CardId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCardId(format!("Not a decimal card id: {s}")))?;
        CardId::new(id)
    }
}

impl TryFrom<u32> for CardId {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self> {
        CardId::new(id)
    }
}

impl From<CardId> for u32 {
    fn from(id: CardId) -> Self {
        id.0
    }
}

/// Logic level on a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[must_use]
    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }

    /// The opposite level.
    #[must_use]
    pub fn inverted(&self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Level::Low => write!(f, "LOW"),
            Level::High => write!(f, "HIGH"),
        }
    }
}

/// Named states of the attendance FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateName {
    /// Startup: indicates boot, checks the network.
    Init,

    /// Ready: accepts swipes and the shutdown button.
    Temp,
}

impl StateName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StateName::Init => "INIT",
            StateName::Temp => "TEMP",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StateName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INIT" => Ok(StateName::Init),
            "TEMP" => Ok(StateName::Temp),
            other => Err(Error::UnknownState(other.to_string())),
        }
    }
}

/// Event delivered to the attendance FSM.
///
/// Events are created by a producer at the moment of a stimulus and consumed
/// exactly once by the FSM loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Delivered to a state when the FSM enters it.
    Entry,

    /// Delivered to a state when the FSM leaves it.
    Exit,

    /// Periodic tick from the timer source.
    Timer,

    /// A complete card was swiped.
    CardRead { id: CardId },

    /// The shutdown button was held across two samples.
    Shutdown,

    /// Kicks off the startup sequence.
    Init,
}

impl Event {
    /// Wire-style event name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::Entry => "ENTRY",
            Event::Exit => "EXIT",
            Event::Timer => "TIMER",
            Event::CardRead { .. } => "CARD_READ",
            Event::Shutdown => "SHUTDOWN",
            Event::Init => "INIT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::CardRead { id } => write!(f, "CARD_READ({id})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Selects which output of a pattern driver a request drives.
///
/// For the indicator this is the LED color, for the buzzer there is a single
/// output at index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSelector(u8);

impl OutputSelector {
    pub const RED: OutputSelector = OutputSelector(0);
    pub const GREEN: OutputSelector = OutputSelector(1);
    pub const BLUE: OutputSelector = OutputSelector(2);
    pub const BUZZER: OutputSelector = OutputSelector(0);

    #[must_use]
    pub const fn new(index: u8) -> Self {
        OutputSelector(index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for OutputSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "output#{}", self.0)
    }
}

/// Blink/beep request rendered by a pattern driver.
///
/// - `repeat_count == 0`: hold the output on (indicator only)
/// - `repeat_count == 1`: toggle forever at the base interval (indicator only)
/// - `repeat_count > 1`: pulse that many times, pause, repeat
///
/// The buzzer pulses `max(repeat_count, 1)` times and then goes idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRequest {
    pub selector: OutputSelector,
    pub repeat_count: u32,
}

impl PatternRequest {
    #[must_use]
    pub const fn new(selector: OutputSelector, repeat_count: u32) -> Self {
        Self {
            selector,
            repeat_count,
        }
    }

    /// Solid-on request for the given output.
    #[must_use]
    pub const fn solid(selector: OutputSelector) -> Self {
        Self::new(selector, 0)
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.repeat_count == 0
    }
}

impl fmt::Display for PatternRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x{}", self.selector, self.repeat_count)
    }
}

/// Change in room occupancy produced by a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyDelta {
    Increment,
    Decrement,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_card_id_bounds() {
        assert!(CardId::new(0).is_ok());
        assert!(CardId::new(9_999_999).is_ok());
        assert!(CardId::new(10_000_000).is_err());
    }

    #[test]
    fn test_card_id_display_is_zero_padded() {
        let id = CardId::new(42).unwrap();
        assert_eq!(id.to_string(), "0000042");
        assert_eq!(id.padded(), "0000042");
        assert_eq!(id.as_u32(), 42);
    }

    #[rstest]
    #[case("1234567", Some(1_234_567))]
    #[case(" 0000042 ", Some(42))]
    #[case("12345678", None)]
    #[case("12a", None)]
    fn test_card_id_from_str(#[case] input: &str, #[case] expected: Option<u32>) {
        let parsed = input.parse::<CardId>().ok().map(|id| id.as_u32());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_card_id_serde_rejects_out_of_range() {
        let ok: CardId = serde_json::from_str("1234567").unwrap();
        assert_eq!(ok.as_u32(), 1_234_567);
        assert!(serde_json::from_str::<CardId>("99999999").is_err());
    }

    #[test]
    fn test_level_helpers() {
        assert!(Level::High.is_high());
        assert_eq!(Level::Low.inverted(), Level::High);
        assert_eq!(Level::from(false), Level::Low);
    }

    #[rstest]
    #[case(StateName::Init, "INIT")]
    #[case(StateName::Temp, "TEMP")]
    fn test_state_name_roundtrip(#[case] state: StateName, #[case] text: &str) {
        assert_eq!(state.to_string(), text);
        assert_eq!(text.parse::<StateName>().unwrap(), state);
    }

    #[test]
    fn test_unknown_state_name() {
        assert!(matches!(
            "IDLE".parse::<StateName>(),
            Err(Error::UnknownState(_))
        ));
    }

    #[test]
    fn test_event_names() {
        let id = CardId::new(1_234_567).unwrap();
        assert_eq!(Event::CardRead { id }.name(), "CARD_READ");
        assert_eq!(Event::CardRead { id }.to_string(), "CARD_READ(1234567)");
        assert_eq!(Event::Shutdown.to_string(), "SHUTDOWN");
    }

    #[test]
    fn test_pattern_request_solid() {
        let request = PatternRequest::solid(OutputSelector::GREEN);
        assert!(request.is_solid());
        assert_eq!(request.selector.index(), 1);
    }
}
