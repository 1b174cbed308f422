//! Engine stand-ins used when no real speech stack is wired up.

use async_trait::async_trait;
use tracing::info;
use valet_foundation::SpeechError;

use super::{Recognizer, Speaker};

/// A recognizer that never hears anything. Keeps the producer task alive
/// without feeding the slot, so the watchers still run.
#[derive(Debug, Default)]
pub struct NoopRecognizer;

#[async_trait]
impl Recognizer for NoopRecognizer {
    async fn next_utterance(&mut self) -> Result<Option<String>, SpeechError> {
        std::future::pending().await
    }
}

/// A speaker that logs instead of synthesizing.
#[derive(Debug, Default)]
pub struct LogSpeaker;

#[async_trait]
impl Speaker for LogSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        info!(target: "tts", "{}", text);
        Ok(())
    }
}
