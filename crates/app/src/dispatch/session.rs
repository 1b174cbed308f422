//! Multi-turn follow-up sessions.
//!
//! Some commands are inherently ambiguous ("play music" — which song?) and
//! need one more utterance before they can execute. `FollowUp` is the
//! reusable prompt → await-predicate → continue combinator that replaces a
//! per-flow AwaitingParameter/Done state machine: speak a clarifying
//! prompt, clear the slot, then watch the slot until a value carrying the
//! terminal token arrives or the session times out. The session blocks its
//! handler (and therefore the dispatch loop) while it waits; the timeout is
//! what keeps a never-answered prompt from stalling the assistant forever.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use valet_telemetry::AssistantMetrics;

use crate::speech::Speaker;
use crate::transcript::{normalize_utterance, TranscriptSlot};

/// The token that signals the awaited parameter has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalToken {
    /// Value must end with the token; the whole value is the parameter
    /// ("believer song" stays "believer song").
    Suffix(&'static str),
    /// Value must start with the token; the parameter is the remainder
    /// ("message is hello" becomes "hello").
    Prefix(&'static str),
}

impl TerminalToken {
    pub fn extract(&self, text: &str) -> Option<String> {
        match self {
            TerminalToken::Suffix(s) => text.ends_with(s).then(|| text.to_string()),
            TerminalToken::Prefix(p) => text.strip_prefix(p).map(|rest| rest.trim().to_string()),
        }
    }
}

pub struct FollowUp {
    pub prompt: String,
    pub token: TerminalToken,
    pub timeout: Duration,
}

impl FollowUp {
    pub fn new(prompt: impl Into<String>, token: TerminalToken, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            token,
            timeout,
        }
    }

    /// Run the session to completion. Returns the extracted parameter, or
    /// `None` when the session is abandoned (timeout, or the slot went
    /// away).
    pub async fn await_parameter(
        &self,
        slot: &TranscriptSlot,
        speaker: &Arc<dyn Speaker>,
        metrics: &Arc<AssistantMetrics>,
    ) -> Option<String> {
        metrics.sessions_started.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = speaker.speak(&self.prompt).await {
            warn!(target: "session", "failed to speak prompt: {}", e);
        }
        slot.clear();
        let mut reader = slot.subscribe();

        let awaited = tokio::time::timeout(self.timeout, async {
            loop {
                let value = reader.next_distinct().await?;
                let text = normalize_utterance(&value);
                if text.is_empty() {
                    continue;
                }
                match self.token.extract(&text) {
                    Some(parameter) => return Some(parameter),
                    None => debug!(target: "session", value = %text, "awaiting terminal token"),
                }
            }
        })
        .await;

        match awaited {
            Ok(Some(parameter)) => {
                metrics.sessions_completed.fetch_add(1, Ordering::Relaxed);
                Some(parameter)
            }
            Ok(None) => None,
            Err(_) => {
                metrics.sessions_timed_out.fetch_add(1, Ordering::Relaxed);
                warn!(target: "session", prompt = %self.prompt, "session timed out, abandoning");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use valet_foundation::SpeechError;

    struct SilentSpeaker;

    #[async_trait]
    impl Speaker for SilentSpeaker {
        async fn speak(&self, _text: &str) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    fn speaker() -> Arc<dyn Speaker> {
        Arc::new(SilentSpeaker)
    }

    #[test]
    fn suffix_token_keeps_whole_value() {
        let token = TerminalToken::Suffix("song");
        assert_eq!(token.extract("believer song").as_deref(), Some("believer song"));
        assert_eq!(token.extract("believer"), None);
    }

    #[test]
    fn prefix_token_strips_and_trims() {
        let token = TerminalToken::Prefix("message is");
        assert_eq!(token.extract("message is  hello there").as_deref(), Some("hello there"));
        assert_eq!(token.extract("the message is hello"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_once_on_terminal_token() {
        let slot = Arc::new(TranscriptSlot::new());
        let metrics = Arc::new(AssistantMetrics::new());
        let session = FollowUp::new(
            "which song do you want to play?",
            TerminalToken::Suffix("song"),
            Duration::from_secs(30),
        );

        let writer = Arc::clone(&slot);
        tokio::spawn(async move {
            for value in ["", "believer", "believer song"] {
                tokio::time::sleep(Duration::from_millis(10)).await;
                writer.write(value);
            }
        });

        let parameter = session
            .await_parameter(&slot, &speaker(), &metrics)
            .await;
        assert_eq!(parameter.as_deref(), Some("believer song"));

        let snap = metrics.snapshot();
        assert_eq!(snap.sessions_completed, 1);
        assert_eq!(snap.sessions_timed_out, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn never_matching_value_times_out() {
        let slot = Arc::new(TranscriptSlot::new());
        let metrics = Arc::new(AssistantMetrics::new());
        let session = FollowUp::new(
            "which song do you want to play?",
            TerminalToken::Suffix("song"),
            Duration::from_millis(200),
        );

        let writer = Arc::clone(&slot);
        tokio::spawn(async move {
            for value in ["", "believer"] {
                tokio::time::sleep(Duration::from_millis(10)).await;
                writer.write(value);
            }
        });

        let parameter = session
            .await_parameter(&slot, &speaker(), &metrics)
            .await;
        assert_eq!(parameter, None);

        let snap = metrics.snapshot();
        assert_eq!(snap.sessions_completed, 0);
        assert_eq!(snap.sessions_timed_out, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_identical_values_are_ignored() {
        let slot = Arc::new(TranscriptSlot::new());
        let metrics = Arc::new(AssistantMetrics::new());
        let session = FollowUp::new(
            "who do you want to send it to?",
            TerminalToken::Prefix("send to"),
            Duration::from_secs(5),
        );

        let writer = Arc::clone(&slot);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            writer.write("umm");
            tokio::time::sleep(Duration::from_millis(10)).await;
            writer.write("UMM");
            tokio::time::sleep(Duration::from_millis(10)).await;
            writer.write("send to anubhav");
        });

        let parameter = session
            .await_parameter(&slot, &speaker(), &metrics)
            .await;
        assert_eq!(parameter.as_deref(), Some("anubhav"));
    }
}
