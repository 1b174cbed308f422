//! Collaborator boundary: OS automation, notifications, web lookups,
//! messaging, and the battery probe. Behavior behind these traits is out of
//! scope for the core; the crate ships logging no-op implementations so the
//! assistant runs headless, and tests substitute recording fakes.

pub mod noop;

use async_trait::async_trait;
use std::sync::Arc;
use valet_foundation::ProbeError;

use crate::speech::Speaker;

/// Fire-and-forget visual alert.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, text: &str);
}

/// Desktop automation effects. The three `*_action` methods are the
/// fallback fan-out targets: each is handed the whole utterance and decides
/// internally whether it applies, reporting back whether it acted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Automation: Send + Sync {
    async fn open_app(&self, name: &str) -> anyhow::Result<()>;
    async fn open_website(&self, name: &str) -> anyhow::Result<()>;
    async fn close_active_window(&self) -> anyhow::Result<()>;
    async fn play_pause(&self) -> anyhow::Result<()>;
    async fn play_music(&self, query: &str, target: MusicTarget) -> anyhow::Result<()>;
    async fn set_volume(&self, percent: u8) -> anyhow::Result<()>;
    async fn volume_percent(&self) -> anyhow::Result<u8>;
    async fn set_brightness(&self, percent: u8) -> anyhow::Result<()>;
    async fn brightness_percent(&self) -> anyhow::Result<u8>;

    async fn browser_action(&self, utterance: &str) -> anyhow::Result<bool>;
    async fn media_action(&self, utterance: &str) -> anyhow::Result<bool>;
    async fn scroll_action(&self, utterance: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTarget {
    YouTube,
    Spotify,
}

/// Web search effect (opens results in whatever the implementation deems a
/// browser).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<()>;
}

/// Outbound messaging (WhatsApp in the reference setup). Recipient
/// resolution — nickname to address — is the implementation's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, recipient: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerReading {
    pub percent: u8,
    pub plugged: bool,
}

/// Battery state probe, polled by the battery watcher.
#[cfg_attr(test, mockall::automock)]
pub trait PowerProbe: Send + Sync {
    fn read(&self) -> Result<PowerReading, ProbeError>;
}

/// The full collaborator set handed to the runtime.
#[derive(Clone)]
pub struct Collaborators {
    pub speaker: Arc<dyn Speaker>,
    pub notifier: Arc<dyn Notifier>,
    pub automation: Arc<dyn Automation>,
    pub search: Arc<dyn WebSearch>,
    pub messenger: Arc<dyn Messenger>,
    pub power: Arc<dyn PowerProbe>,
}

impl Collaborators {
    /// Logging no-op collaborators for a headless run.
    pub fn headless() -> Self {
        Self {
            speaker: Arc::new(crate::speech::LogSpeaker),
            notifier: Arc::new(noop::LogNotifier),
            automation: Arc::new(noop::LogAutomation),
            search: Arc::new(noop::LogSearch),
            messenger: Arc::new(noop::LogMessenger),
            power: Arc::new(noop::StaticPowerProbe::default()),
        }
    }
}
