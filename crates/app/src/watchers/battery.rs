//! Battery watcher.
//!
//! Two sub-loops over one power probe: a level loop announcing threshold
//! bands on every tick the charge sits in one, and a plug loop that is
//! edge-triggered on the plugged/unplugged transition against its cached
//! previous state.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use valet_telemetry::AssistantMetrics;

use crate::collab::PowerProbe;
use crate::dispatch::ActionExecutor;

/// Ordered threshold bands. `classify` checks the narrow bands before the
/// wide one so each band stays reachable, and returns the first match only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryBand {
    Full,
    Critical,
    VeryLow,
    Low,
}

impl BatteryBand {
    pub fn classify(percent: u8) -> Option<Self> {
        if percent >= 100 {
            Some(BatteryBand::Full)
        } else if percent <= 5 {
            Some(BatteryBand::Critical)
        } else if percent <= 10 {
            Some(BatteryBand::VeryLow)
        } else if percent <= 20 {
            Some(BatteryBand::Low)
        } else {
            None
        }
    }

    pub fn announcement(&self, percent: u8) -> String {
        match self {
            BatteryBand::Full => "battery fully charged, please unplug the charger".to_string(),
            BatteryBand::Low => format!("battery is low, {} percent remaining", percent),
            BatteryBand::VeryLow => {
                format!("battery is very low, {} percent remaining", percent)
            }
            BatteryBand::Critical => format!(
                "battery critically low at {} percent, charge the system now",
                percent
            ),
        }
    }
}

pub struct BatteryWatcher {
    probe: Arc<dyn PowerProbe>,
    executor: ActionExecutor,
    metrics: Arc<AssistantMetrics>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl BatteryWatcher {
    pub fn new(
        probe: Arc<dyn PowerProbe>,
        executor: ActionExecutor,
        metrics: Arc<AssistantMetrics>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            probe,
            executor,
            metrics,
            interval,
            shutdown_rx,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "watcher", "Battery level watcher started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    let reading = match self.probe.read() {
                        Ok(reading) => reading,
                        Err(e) => {
                            self.metrics.watcher_errors.fetch_add(1, Ordering::Relaxed);
                            warn!(target: "watcher", "battery probe failed: {}", e);
                            continue;
                        }
                    };
                    if let Some(band) = BatteryBand::classify(reading.percent) {
                        self.metrics.battery_alerts.fetch_add(1, Ordering::Relaxed);
                        self.executor.alert(&band.announcement(reading.percent)).await;
                    }
                }
            }
        }

        info!(target: "watcher", "Battery level watcher stopped");
    }
}

pub struct PlugWatcher {
    probe: Arc<dyn PowerProbe>,
    executor: ActionExecutor,
    metrics: Arc<AssistantMetrics>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl PlugWatcher {
    pub fn new(
        probe: Arc<dyn PowerProbe>,
        executor: ActionExecutor,
        metrics: Arc<AssistantMetrics>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            probe,
            executor,
            metrics,
            interval,
            shutdown_rx,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "watcher", "Plug state watcher started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // First successful read is the baseline; only transitions fire.
        let mut previous: Option<bool> = None;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    let reading = match self.probe.read() {
                        Ok(reading) => reading,
                        Err(e) => {
                            self.metrics.watcher_errors.fetch_add(1, Ordering::Relaxed);
                            warn!(target: "watcher", "battery probe failed: {}", e);
                            continue;
                        }
                    };
                    match previous {
                        None => previous = Some(reading.plugged),
                        Some(prev) if prev != reading.plugged => {
                            previous = Some(reading.plugged);
                            self.metrics.plug_alerts.fetch_add(1, Ordering::Relaxed);
                            let message = if reading.plugged {
                                "charging started"
                            } else {
                                "charging stopped"
                            };
                            self.executor.alert(message).await;
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        info!(target: "watcher", "Plug state watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_percent_maps_to_one_band() {
        assert_eq!(BatteryBand::classify(100), Some(BatteryBand::Full));
        assert_eq!(BatteryBand::classify(19), Some(BatteryBand::Low));
        assert_eq!(BatteryBand::classify(9), Some(BatteryBand::VeryLow));
        assert_eq!(BatteryBand::classify(4), Some(BatteryBand::Critical));
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(BatteryBand::classify(20), Some(BatteryBand::Low));
        assert_eq!(BatteryBand::classify(10), Some(BatteryBand::VeryLow));
        assert_eq!(BatteryBand::classify(5), Some(BatteryBand::Critical));
        assert_eq!(BatteryBand::classify(21), None);
        assert_eq!(BatteryBand::classify(99), None);
    }
}
