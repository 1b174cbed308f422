//! Paired-action executor.
//!
//! Every leaf behavior runs as a pair: a unit speaking the feedback and a
//! unit performing the effect, started concurrently and joined before the
//! caller resumes. The caller therefore knows both halves finished before
//! the next poll tick, but gets no ordering guarantee between them.

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::warn;
use valet_telemetry::AssistantMetrics;

use crate::collab::Notifier;
use crate::speech::Speaker;

#[derive(Clone)]
pub struct ActionExecutor {
    speaker: Arc<dyn Speaker>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<AssistantMetrics>,
}

impl ActionExecutor {
    pub fn new(
        speaker: Arc<dyn Speaker>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<AssistantMetrics>,
    ) -> Self {
        Self {
            speaker,
            notifier,
            metrics,
        }
    }

    /// Speak `feedback` and drive `effect` concurrently; return once both
    /// are done. Failures on either side are logged and counted, never
    /// escalated to the caller.
    pub async fn run<F>(&self, feedback: &str, effect: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.metrics.paired_actions.fetch_add(1, Ordering::Relaxed);

        let speaker = Arc::clone(&self.speaker);
        let text = feedback.to_string();
        let speak_unit = tokio::spawn(async move { speaker.speak(&text).await });
        let effect_unit = tokio::spawn(effect);

        let (spoke, acted) = tokio::join!(speak_unit, effect_unit);

        match spoke {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.metrics.speak_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "executor", "speak unit failed: {}", e);
            }
            Err(e) => {
                self.metrics.speak_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "executor", "speak unit panicked: {}", e);
            }
        }
        match acted {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.metrics.effect_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "executor", "effect unit failed: {}", e);
            }
            Err(e) => {
                self.metrics.effect_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "executor", "effect unit panicked: {}", e);
            }
        }
    }

    /// The watcher flavor of a paired action: speak the text and raise the
    /// same text as a visual alert.
    pub async fn alert(&self, text: &str) {
        let notifier = Arc::clone(&self.notifier);
        let body = text.to_string();
        self.run(text, async move {
            notifier.notify(&body);
            Ok(())
        })
        .await;
    }
}
