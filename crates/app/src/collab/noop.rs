//! Logging no-op collaborators. Each logs the effect it would perform and
//! succeeds, which keeps the coordination layer fully exercisable on a
//! machine with none of the real integrations installed.

use async_trait::async_trait;
use tracing::info;
use valet_foundation::ProbeError;

use super::{Automation, Messenger, MusicTarget, Notifier, PowerProbe, PowerReading, WebSearch};

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, text: &str) {
        info!(target: "notify", "{}", text);
    }
}

#[derive(Debug, Default)]
pub struct LogAutomation;

#[async_trait]
impl Automation for LogAutomation {
    async fn open_app(&self, name: &str) -> anyhow::Result<()> {
        info!(target: "automation", app = name, "open application");
        Ok(())
    }

    async fn open_website(&self, name: &str) -> anyhow::Result<()> {
        info!(target: "automation", site = name, "open website");
        Ok(())
    }

    async fn close_active_window(&self) -> anyhow::Result<()> {
        info!(target: "automation", "close active window");
        Ok(())
    }

    async fn play_pause(&self) -> anyhow::Result<()> {
        info!(target: "automation", "toggle playback");
        Ok(())
    }

    async fn play_music(&self, query: &str, target: MusicTarget) -> anyhow::Result<()> {
        info!(target: "automation", query, ?target, "play music");
        Ok(())
    }

    async fn set_volume(&self, percent: u8) -> anyhow::Result<()> {
        info!(target: "automation", percent, "set volume");
        Ok(())
    }

    async fn volume_percent(&self) -> anyhow::Result<u8> {
        Ok(50)
    }

    async fn set_brightness(&self, percent: u8) -> anyhow::Result<()> {
        info!(target: "automation", percent, "set brightness");
        Ok(())
    }

    async fn brightness_percent(&self) -> anyhow::Result<u8> {
        Ok(70)
    }

    async fn browser_action(&self, utterance: &str) -> anyhow::Result<bool> {
        info!(target: "automation", utterance, "browser action considered");
        Ok(false)
    }

    async fn media_action(&self, utterance: &str) -> anyhow::Result<bool> {
        info!(target: "automation", utterance, "media action considered");
        Ok(false)
    }

    async fn scroll_action(&self, utterance: &str) -> anyhow::Result<bool> {
        info!(target: "automation", utterance, "scroll action considered");
        Ok(false)
    }
}

#[derive(Debug, Default)]
pub struct LogSearch;

#[async_trait]
impl WebSearch for LogSearch {
    async fn search(&self, query: &str) -> anyhow::Result<()> {
        info!(target: "search", query, "web search");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    async fn send(&self, recipient: &str, body: &str) -> anyhow::Result<()> {
        info!(target: "messenger", recipient, body, "send message");
        Ok(())
    }
}

/// A battery probe with a fixed reading, for headless runs and demos.
#[derive(Debug, Clone, Copy)]
pub struct StaticPowerProbe {
    pub reading: PowerReading,
}

impl Default for StaticPowerProbe {
    fn default() -> Self {
        Self {
            reading: PowerReading {
                percent: 80,
                plugged: true,
            },
        }
    }
}

impl PowerProbe for StaticPowerProbe {
    fn read(&self) -> Result<PowerReading, ProbeError> {
        Ok(self.reading)
    }
}
