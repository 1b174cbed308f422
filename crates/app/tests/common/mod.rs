//! Recording collaborator fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use valet_app::collab::{
    Automation, Collaborators, Messenger, MusicTarget, Notifier, PowerProbe, PowerReading,
    WebSearch,
};
use valet_app::speech::Speaker;
use valet_foundation::{ProbeError, SpeechError};

#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notes: Arc<Mutex<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, text: &str) {
        self.notes.lock().push(text.to_string());
    }
}

/// Records every effect invocation as `"method:argument"`. The claim flags
/// steer what the three fallback handlers report.
#[derive(Default)]
pub struct RecordingAutomation {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub claim_browser: bool,
    pub claim_media: bool,
    pub claim_scroll: bool,
}

#[async_trait]
impl Automation for RecordingAutomation {
    async fn open_app(&self, name: &str) -> anyhow::Result<()> {
        self.calls.lock().push(format!("open_app:{name}"));
        Ok(())
    }

    async fn open_website(&self, name: &str) -> anyhow::Result<()> {
        self.calls.lock().push(format!("open_website:{name}"));
        Ok(())
    }

    async fn close_active_window(&self) -> anyhow::Result<()> {
        self.calls.lock().push("close".to_string());
        Ok(())
    }

    async fn play_pause(&self) -> anyhow::Result<()> {
        self.calls.lock().push("play_pause".to_string());
        Ok(())
    }

    async fn play_music(&self, query: &str, target: MusicTarget) -> anyhow::Result<()> {
        self.calls
            .lock()
            .push(format!("play_music:{query}:{target:?}"));
        Ok(())
    }

    async fn set_volume(&self, percent: u8) -> anyhow::Result<()> {
        self.calls.lock().push(format!("set_volume:{percent}"));
        Ok(())
    }

    async fn volume_percent(&self) -> anyhow::Result<u8> {
        self.calls.lock().push("volume_percent".to_string());
        Ok(35)
    }

    async fn set_brightness(&self, percent: u8) -> anyhow::Result<()> {
        self.calls.lock().push(format!("set_brightness:{percent}"));
        Ok(())
    }

    async fn brightness_percent(&self) -> anyhow::Result<u8> {
        self.calls.lock().push("brightness_percent".to_string());
        Ok(65)
    }

    async fn browser_action(&self, utterance: &str) -> anyhow::Result<bool> {
        self.calls.lock().push(format!("browser_action:{utterance}"));
        Ok(self.claim_browser)
    }

    async fn media_action(&self, utterance: &str) -> anyhow::Result<bool> {
        self.calls.lock().push(format!("media_action:{utterance}"));
        Ok(self.claim_media)
    }

    async fn scroll_action(&self, utterance: &str) -> anyhow::Result<bool> {
        self.calls.lock().push(format!("scroll_action:{utterance}"));
        Ok(self.claim_scroll)
    }
}

#[derive(Default)]
pub struct RecordingSearch {
    pub queries: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl WebSearch for RecordingSearch {
    async fn search(&self, query: &str) -> anyhow::Result<()> {
        self.queries.lock().push(query.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, recipient: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}

/// Pops one reading per `read` call; once drained it keeps returning the
/// final reading.
pub struct SequencePowerProbe {
    readings: Mutex<VecDeque<PowerReading>>,
    last: Mutex<PowerReading>,
}

impl SequencePowerProbe {
    pub fn new(readings: impl IntoIterator<Item = PowerReading>) -> Self {
        let queue: VecDeque<_> = readings.into_iter().collect();
        let last = *queue.back().expect("at least one reading");
        Self {
            readings: Mutex::new(queue),
            last: Mutex::new(last),
        }
    }

    pub fn plugged(states: impl IntoIterator<Item = bool>) -> Self {
        Self::new(states.into_iter().map(|plugged| PowerReading {
            percent: 50,
            plugged,
        }))
    }

    pub fn percents(percents: impl IntoIterator<Item = u8>) -> Self {
        Self::new(percents.into_iter().map(|percent| PowerReading {
            percent,
            plugged: false,
        }))
    }
}

impl PowerProbe for SequencePowerProbe {
    fn read(&self) -> Result<PowerReading, ProbeError> {
        match self.readings.lock().pop_front() {
            Some(reading) => {
                *self.last.lock() = reading;
                Ok(reading)
            }
            None => Ok(*self.last.lock()),
        }
    }
}

/// A collaborator bundle over the recording fakes, plus handles to the
/// recordings themselves.
pub struct Recorded {
    pub collaborators: Collaborators,
    pub spoken: Arc<Mutex<Vec<String>>>,
    pub notes: Arc<Mutex<Vec<String>>>,
    pub automation_calls: Arc<Mutex<Vec<String>>>,
    pub searches: Arc<Mutex<Vec<String>>>,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

pub fn recorded_collaborators(probe: Arc<dyn PowerProbe>) -> Recorded {
    recorded_with_automation(probe, RecordingAutomation::default())
}

pub fn recorded_with_automation(
    probe: Arc<dyn PowerProbe>,
    automation: RecordingAutomation,
) -> Recorded {
    let speaker = RecordingSpeaker::default();
    let notifier = RecordingNotifier::default();
    let search = RecordingSearch::default();
    let messenger = RecordingMessenger::default();

    let spoken = Arc::clone(&speaker.spoken);
    let notes = Arc::clone(&notifier.notes);
    let automation_calls = Arc::clone(&automation.calls);
    let searches = Arc::clone(&search.queries);
    let sent = Arc::clone(&messenger.sent);

    Recorded {
        collaborators: Collaborators {
            speaker: Arc::new(speaker),
            notifier: Arc::new(notifier),
            automation: Arc::new(automation),
            search: Arc::new(search),
            messenger: Arc::new(messenger),
            power: probe,
        },
        spoken,
        notes,
        automation_calls,
        searches,
        sent,
    }
}
