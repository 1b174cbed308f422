//! Scripted recognizer for tests and demos: replays a fixed utterance
//! sequence with per-item delays, then goes quiet.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use valet_foundation::SpeechError;

use super::Recognizer;

pub struct ScriptedRecognizer {
    script: VecDeque<(Duration, String)>,
    /// When true, the recognizer reports exhaustion instead of pending
    /// forever after the script runs out.
    finish_when_done: bool,
}

impl ScriptedRecognizer {
    pub fn new(items: impl IntoIterator<Item = (Duration, String)>) -> Self {
        Self {
            script: items.into_iter().collect(),
            finish_when_done: false,
        }
    }

    /// Make `next_utterance` return `Ok(None)` once the script is drained.
    pub fn finishing(mut self) -> Self {
        self.finish_when_done = true;
        self
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn next_utterance(&mut self) -> Result<Option<String>, SpeechError> {
        match self.script.pop_front() {
            Some((delay, text)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Some(text))
            }
            None if self.finish_when_done => Ok(None),
            None => std::future::pending().await,
        }
    }
}
