//! Card reader decoding.
//!
//! The reader behaves like a keyboard: a swipe arrives as seven digit key
//! presses followed by the terminator key. [`CardDecoder`] folds that
//! keystroke stream into card ids, and [`CardReader`] runs the decoder
//! against a live [`KeySymbolSource`] and posts `CardRead` events.
//!
//! # Decoding rules
//!
//! ```text
//! digit down, count < 7   ->  acc += digit * 10^(6 - count); count += 1
//!                             count == 7: emit acc, acc = 0 (count stays 7)
//! digit down, count == 7  ->  dropped
//! terminator up           ->  count = 0, acc = 0
//! anything else           ->  ignored
//! ```
//!
//! Digits typed after the seventh and before the terminator key-up never
//! reach a later id.
//!
//! # Examples
//!
//! ```
//! use attendance_hardware::card_reader::decode_all;
//! use attendance_hardware::KeyStroke;
//!
//! let ids = decode_all(&KeyStroke::swipe("1234567"));
//! assert_eq!(ids.len(), 1);
//! assert_eq!(ids[0].as_u32(), 1_234_567);
//! ```

use crate::devices::AnyKeySource;
use crate::traits::KeySymbolSource;
use crate::types::{KeyStroke, KeyTransition};
use crate::Result;
use attendance_core::constants::CARD_ID_DIGITS;
use attendance_core::{CardId, Event, QueueSender};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Pure keystroke-to-card-id fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDecoder {
    byte_count: u32,
    accumulator: u32,
}

impl CardDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits consumed since the last terminator key-up.
    pub fn byte_count(&self) -> u32 {
        self.byte_count
    }

    /// Feed one keystroke. Returns a card id when the seventh digit lands.
    pub fn feed(&mut self, stroke: &KeyStroke) -> Option<CardId> {
        let mut emitted = None;

        if self.byte_count < CARD_ID_DIGITS
            && stroke.transition == KeyTransition::Down
            && let Some(digit) = stroke.symbol.as_digit()
        {
            let exponent = CARD_ID_DIGITS - 1 - self.byte_count;
            self.accumulator += u32::from(digit) * 10u32.pow(exponent);
            self.byte_count += 1;

            if self.byte_count == CARD_ID_DIGITS {
                emitted = CardId::new(self.accumulator).ok();
                self.accumulator = 0;
            }
        }

        if stroke.transition == KeyTransition::Up && stroke.symbol.is_terminator() {
            self.byte_count = 0;
            self.accumulator = 0;
        }

        emitted
    }
}

/// Decode a complete keystroke sequence with a fresh decoder.
pub fn decode_all<'a>(strokes: impl IntoIterator<Item = &'a KeyStroke>) -> Vec<CardId> {
    let mut decoder = CardDecoder::new();
    strokes
        .into_iter()
        .filter_map(|stroke| decoder.feed(stroke))
        .collect()
}

/// Producer task turning a key source into `CardRead` events.
#[derive(Debug)]
pub struct CardReader {
    source: AnyKeySource,
    retry_delay: Duration,
}

impl CardReader {
    pub fn new(source: AnyKeySource, retry_delay: Duration) -> Self {
        Self {
            source,
            retry_delay,
        }
    }

    /// Read keystrokes until the source ends or the FSM queue closes.
    ///
    /// A source error is logged, the decoder restarts from scratch, and the
    /// read is retried after the retry delay.
    pub async fn run(mut self, events: QueueSender<Event>) -> Result<()> {
        let mut decoder = CardDecoder::new();
        info!("Card reader listening");

        loop {
            match self.source.next().await {
                Ok(Some(stroke)) => {
                    trace!(symbol = %stroke.symbol, transition = ?stroke.transition, "Keystroke");

                    if let Some(id) = decoder.feed(&stroke) {
                        info!(card_id = %id, "Card read");
                        if events.put(Event::CardRead { id }).is_err() {
                            debug!("Event queue closed, card reader stopping");
                            return Ok(());
                        }
                    }
                }
                Ok(None) => {
                    info!("Card reader source ended");
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        disconnected = e.is_disconnect(),
                        retry_ms = self.retry_delay.as_millis() as u64,
                        "Card reader unavailable, retrying"
                    );
                    decoder = CardDecoder::new();
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockKeySource;
    use crate::types::KeySymbol;
    use crate::HardwareError;
    use attendance_core::queue;

    fn digits_down(digits: &[u8]) -> Vec<KeyStroke> {
        digits
            .iter()
            .map(|d| KeyStroke::down(KeySymbol::Digit(*d)))
            .collect()
    }

    #[test]
    fn test_single_swipe() {
        let ids = decode_all(&KeyStroke::swipe("1234567"));
        assert_eq!(ids, vec![CardId::new(1_234_567).unwrap()]);
    }

    #[test]
    fn test_leading_zeros_preserved_by_position() {
        let ids = decode_all(&KeyStroke::swipe("0000042"));
        assert_eq!(ids[0].as_u32(), 42);
    }

    #[test]
    fn test_emits_on_seventh_digit_before_terminator() {
        let mut decoder = CardDecoder::new();
        let strokes = digits_down(&[9, 8, 7, 6, 5, 4, 3]);

        let emitted: Vec<_> = strokes.iter().filter_map(|s| decoder.feed(s)).collect();
        assert_eq!(emitted, vec![CardId::new(9_876_543).unwrap()]);
        assert_eq!(decoder.byte_count(), 7);
    }

    #[test]
    fn test_extra_digits_dropped_until_terminator_up() {
        let mut strokes = digits_down(&[1, 1, 1, 1, 1, 1, 1, 5, 5]);
        strokes.push(KeyStroke::down(KeySymbol::Enter));
        strokes.extend(digits_down(&[6]));
        strokes.push(KeyStroke::up(KeySymbol::Enter));
        strokes.extend(KeyStroke::swipe("2222222"));

        let ids = decode_all(&strokes);
        assert_eq!(
            ids,
            vec![CardId::new(1_111_111).unwrap(), CardId::new(2_222_222).unwrap()]
        );
    }

    #[test]
    fn test_terminator_down_does_not_reset() {
        let mut decoder = CardDecoder::new();
        for s in digits_down(&[1, 2, 3]) {
            decoder.feed(&s);
        }
        decoder.feed(&KeyStroke::down(KeySymbol::Enter));
        assert_eq!(decoder.byte_count(), 3);

        decoder.feed(&KeyStroke::up(KeySymbol::Enter));
        assert_eq!(decoder.byte_count(), 0);
    }

    #[test]
    fn test_truncated_swipe_does_not_leak_into_next() {
        let mut strokes = KeyStroke::swipe("123");
        strokes.extend(KeyStroke::swipe("7654321"));

        assert_eq!(decode_all(&strokes), vec![CardId::new(7_654_321).unwrap()]);
    }

    #[test]
    fn test_unrecognized_and_key_up_digits_ignored() {
        let mut strokes = vec![
            KeyStroke::down(KeySymbol::Other("KEY_LEFTSHIFT".into())),
            KeyStroke::up(KeySymbol::Digit(9)),
        ];
        strokes.extend(KeyStroke::swipe("5555555"));

        assert_eq!(decode_all(&strokes), vec![CardId::new(5_555_555).unwrap()]);
    }

    #[tokio::test]
    async fn test_reader_posts_events_and_ends_with_source() {
        let (source, handle) = MockKeySource::new();
        let (tx, mut rx) = queue::channel();

        handle.swipe("1234567").unwrap();
        handle.swipe("0000001").unwrap();
        drop(handle);

        CardReader::new(source.into(), Duration::from_millis(10))
            .run(tx)
            .await
            .unwrap();

        assert_eq!(
            rx.get().await,
            Some(Event::CardRead {
                id: CardId::new(1_234_567).unwrap()
            })
        );
        assert_eq!(
            rx.get().await,
            Some(Event::CardRead {
                id: CardId::new(1).unwrap()
            })
        );
        assert_eq!(rx.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reader_retries_after_error_with_fresh_decoder() {
        let (source, handle) = MockKeySource::new();
        let (tx, mut rx) = queue::channel();

        handle.send_all(digits_down(&[1, 2, 3])).unwrap();
        handle.fail(HardwareError::disconnected("HID c216:0180")).unwrap();
        handle.swipe("4444444").unwrap();
        drop(handle);

        let started = tokio::time::Instant::now();
        CardReader::new(source.into(), Duration::from_secs(1))
            .run(tx)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(
            rx.get().await,
            Some(Event::CardRead {
                id: CardId::new(4_444_444).unwrap()
            })
        );
        assert_eq!(rx.get().await, None);
    }

    #[tokio::test]
    async fn test_reader_stops_when_queue_closed() {
        let (source, handle) = MockKeySource::new();
        let (tx, rx) = queue::channel();
        drop(rx);

        handle.swipe("1234567").unwrap();

        CardReader::new(source.into(), Duration::from_millis(10))
            .run(tx)
            .await
            .unwrap();
    }
}
