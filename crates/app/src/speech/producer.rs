//! Recognition producer task: pumps the recognizer into the transcript
//! slot. Clears the slot once at session start and applies no debouncing —
//! all debouncing is consumer-side.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use valet_telemetry::AssistantMetrics;

use super::Recognizer;
use crate::transcript::TranscriptSlot;

pub struct RecognitionProducer {
    recognizer: Box<dyn Recognizer>,
    slot: Arc<TranscriptSlot>,
    metrics: Arc<AssistantMetrics>,
    shutdown_rx: watch::Receiver<bool>,
}

impl RecognitionProducer {
    pub fn new(
        recognizer: Box<dyn Recognizer>,
        slot: Arc<TranscriptSlot>,
        metrics: Arc<AssistantMetrics>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            recognizer,
            slot,
            metrics,
            shutdown_rx,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "speech", "Recognition producer starting");
        self.slot.clear();

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    break;
                }
                result = self.recognizer.next_utterance() => {
                    match result {
                        Ok(Some(text)) => {
                            debug!(target: "speech", utterance = %text, "recognized");
                            self.metrics.utterances_recognized.fetch_add(1, Ordering::Relaxed);
                            self.slot.write(&text);
                        }
                        Ok(None) => {
                            info!(target: "speech", "Recognizer exhausted, producer stopping");
                            break;
                        }
                        Err(e) => {
                            // A flaky engine read skips this utterance; the
                            // producer keeps listening.
                            warn!(target: "speech", "recognition error: {}", e);
                        }
                    }
                }
            }
        }

        info!(target: "speech", "Recognition producer stopped");
    }
}
