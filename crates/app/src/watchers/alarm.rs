//! Alarm watcher.
//!
//! Same shape as the schedule watcher against the single-value alarm
//! store, with a tighter interval and a fixed alert message. The alarm
//! stays set after firing (the store is only ever overwritten), so the
//! last-fired day is what keeps it to one ring per day.

use chrono::NaiveDate;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use valet_foundation::SharedClock;
use valet_stores::{AlarmStore, TimeKey};
use valet_telemetry::AssistantMetrics;

use crate::dispatch::ActionExecutor;

pub const ALARM_MESSAGE: &str = "this is your alarm";

pub struct AlarmWatcher {
    store: AlarmStore,
    executor: ActionExecutor,
    clock: SharedClock,
    metrics: Arc<AssistantMetrics>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,

    alarm: Option<TimeKey>,
    mtime: Option<SystemTime>,
    last_fired: Option<(TimeKey, NaiveDate)>,
}

impl AlarmWatcher {
    pub fn new(
        store: AlarmStore,
        executor: ActionExecutor,
        clock: SharedClock,
        metrics: Arc<AssistantMetrics>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store,
            executor,
            clock,
            metrics,
            interval,
            shutdown_rx,
            alarm: None,
            mtime: None,
            last_fired: None,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "watcher", path = %self.store.path().display(), "Alarm watcher started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut shutdown_rx = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        info!(target: "watcher", "Alarm watcher stopped");
    }

    /// One poll pass. Public so tests can drive the watcher tick by tick
    /// with a virtual clock.
    pub async fn tick(&mut self) {
        self.reload_if_changed();

        let now = self.clock.local_now();
        let key = TimeKey::from_local(now);
        let today = now.date();

        if self.alarm.as_ref() != Some(&key) {
            return;
        }
        if self.last_fired.as_ref() == Some(&(key.clone(), today)) {
            debug!(target: "watcher", %key, "alarm already fired today");
            return;
        }

        self.last_fired = Some((key, today));
        self.metrics.alarm_fires.fetch_add(1, Ordering::Relaxed);
        self.executor.alert(ALARM_MESSAGE).await;
    }

    fn reload_if_changed(&mut self) {
        let modified = self.store.modified();
        if modified == self.mtime {
            return;
        }
        match self.store.load() {
            Ok(alarm) => {
                debug!(target: "watcher", ?alarm, "alarm store reloaded");
                self.alarm = alarm;
                self.mtime = modified;
            }
            Err(e) => {
                self.metrics.watcher_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "watcher", "failed to reload alarm store: {}", e);
            }
        }
    }
}
