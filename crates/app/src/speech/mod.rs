//! Speech engine boundary.
//!
//! The actual speech-to-text and text-to-speech engines live outside this
//! core. They plug in through the `Recognizer` and `Speaker` traits; the
//! crate ships a no-op pair and a scripted recognizer for tests and demos.

pub mod noop;
pub mod producer;
pub mod scripted;

use async_trait::async_trait;
use valet_foundation::SpeechError;

pub use noop::{LogSpeaker, NoopRecognizer};
pub use producer::RecognitionProducer;
pub use scripted::ScriptedRecognizer;

/// Source of recognized utterances.
#[async_trait]
pub trait Recognizer: Send {
    /// The next recognized utterance. `Ok(None)` means the source is
    /// exhausted and the producer should stop.
    async fn next_utterance(&mut self) -> Result<Option<String>, SpeechError>;
}

/// Text-to-speech sink. `speak` blocks until the text has been spoken, so
/// the paired-action executor's join barrier covers the audible feedback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}
