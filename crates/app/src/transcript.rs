//! The shared transcript slot.
//!
//! A single overwritable value carrying the most recent recognized
//! utterance. The recognition producer overwrites it; the dispatch loop and
//! multi-turn sessions each hold their own reader cursor. Backed by a
//! `tokio::sync::watch` channel, so consumers block on a change
//! notification instead of busy-polling, and a burst of writes coalesces to
//! the latest value for a slow consumer.

use once_cell::sync::Lazy;
use tokio::sync::watch;

#[derive(Debug)]
pub struct TranscriptSlot {
    tx: watch::Sender<String>,
}

impl Default for TranscriptSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptSlot {
    /// Create an empty slot. Empty content means "no pending utterance".
    pub fn new() -> Self {
        let (tx, _) = watch::channel(String::new());
        Self { tx }
    }

    /// Replace the slot's entire content.
    pub fn write(&self, text: &str) {
        self.tx.send_replace(text.to_string());
    }

    /// Reset to "no pending utterance".
    pub fn clear(&self) {
        self.tx.send_replace(String::new());
    }

    /// A new consumer cursor. Each consumer debounces against its own
    /// last-seen value; there is no shared cursor.
    pub fn subscribe(&self) -> TranscriptReader {
        TranscriptReader {
            rx: self.tx.subscribe(),
            last_seen: String::new(),
        }
    }

    /// Current content, for diagnostics.
    pub fn peek(&self) -> String {
        self.tx.borrow().clone()
    }
}

/// A consumer-side cursor over the transcript slot.
pub struct TranscriptReader {
    rx: watch::Receiver<String>,
    last_seen: String,
}

impl TranscriptReader {
    /// Wait for the next value that differs (case-insensitively) from the
    /// last one this reader yielded. A consumer must never act twice on the
    /// same unchanged value, so rewrites of identical text are swallowed
    /// here. Returns `None` once the slot has been dropped.
    pub async fn next_distinct(&mut self) -> Option<String> {
        loop {
            self.rx.changed().await.ok()?;
            let current = self.rx.borrow_and_update().clone();
            if current.eq_ignore_ascii_case(&self.last_seen) {
                continue;
            }
            self.last_seen = current.clone();
            return Some(current);
        }
    }
}

/// Filler tokens stripped before classification.
static FILLER_TOKENS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["hey valet", "valet", "please", "kindly"]);

/// Lowercase, strip filler tokens, collapse the leftover whitespace. The
/// dispatch loop normalizes every value before classifying it; the producer
/// writes recognition output as-is.
pub fn normalize_utterance(raw: &str) -> String {
    let mut text = raw.to_lowercase();
    for token in FILLER_TOKENS.iter() {
        text = text.replace(token, " ");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reader_skips_case_insensitive_repeats() {
        let slot = TranscriptSlot::new();
        let mut reader = slot.subscribe();

        slot.write("Open Chrome");
        assert_eq!(reader.next_distinct().await.unwrap(), "Open Chrome");

        // Identical content (modulo case) must not be yielded again, even
        // though each write marks the channel changed.
        slot.write("open chrome");
        slot.write("OPEN CHROME");
        slot.write("check battery");
        assert_eq!(reader.next_distinct().await.unwrap(), "check battery");
    }

    #[tokio::test]
    async fn burst_of_writes_coalesces_to_latest() {
        let slot = TranscriptSlot::new();
        let mut reader = slot.subscribe();

        slot.write("first");
        slot.write("second");
        slot.write("third");
        assert_eq!(reader.next_distinct().await.unwrap(), "third");
    }

    #[tokio::test]
    async fn clear_resets_to_empty() {
        let slot = TranscriptSlot::new();
        let mut reader = slot.subscribe();

        slot.write("open chrome");
        assert_eq!(reader.next_distinct().await.unwrap(), "open chrome");

        slot.clear();
        assert_eq!(reader.next_distinct().await.unwrap(), "");
        assert_eq!(slot.peek(), "");
    }

    #[test]
    fn normalize_strips_fillers_and_case() {
        assert_eq!(normalize_utterance("Hey Valet, Open Chrome"), ", open chrome");
        assert_eq!(normalize_utterance("  CHECK   battery "), "check battery");
        assert_eq!(normalize_utterance("please play music"), "play music");
    }
}
