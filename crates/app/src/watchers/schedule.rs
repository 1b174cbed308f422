//! Schedule watcher.
//!
//! Polls the schedule store on a fixed interval, reloading the in-memory
//! copy only when the file's mtime changes. On every tick the current wall
//! clock is formatted as a time key and looked up by string equality; a hit
//! fires the entry's activity as a paired action. A per-entry last-fired
//! day keeps an entry from re-firing on later ticks inside the same minute
//! — each entry fires at most once per calendar day.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use valet_foundation::SharedClock;
use valet_stores::{ScheduleStore, TimeKey};
use valet_telemetry::AssistantMetrics;

use crate::dispatch::ActionExecutor;

pub struct ScheduleWatcher {
    store: ScheduleStore,
    executor: ActionExecutor,
    clock: SharedClock,
    metrics: Arc<AssistantMetrics>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,

    entries: HashMap<TimeKey, String>,
    mtime: Option<SystemTime>,
    last_fired: HashMap<TimeKey, NaiveDate>,
}

impl ScheduleWatcher {
    pub fn new(
        store: ScheduleStore,
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
            entries: HashMap::new(),
            mtime: None,
            last_fired: HashMap::new(),
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "watcher", path = %self.store.path().display(), "Schedule watcher started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut shutdown_rx = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        info!(target: "watcher", "Schedule watcher stopped");
    }

    /// One poll pass. Public so tests can drive the watcher tick by tick
    /// with a virtual clock.
    pub async fn tick(&mut self) {
        self.reload_if_changed();

        let now = self.clock.local_now();
        let key = TimeKey::from_local(now);
        let today = now.date();

        let Some(activity) = self.entries.get(&key) else {
            return;
        };
        if self.last_fired.get(&key) == Some(&today) {
            debug!(target: "watcher", %key, "entry already fired today");
            return;
        }

        let text = activity.clone();
        self.last_fired.insert(key, today);
        // Stale days drop out here, so the cache resets at midnight and
        // never outgrows the store.
        self.last_fired.retain(|_, day| *day == today);

        self.metrics.schedule_fires.fetch_add(1, Ordering::Relaxed);
        self.executor.alert(&text).await;
    }

    fn reload_if_changed(&mut self) {
        let modified = self.store.modified();
        if modified == self.mtime {
            return;
        }
        match self.store.load() {
            Ok(entries) => {
                debug!(target: "watcher", count = entries.len(), "schedule store reloaded");
                self.entries = entries;
                self.mtime = modified;
            }
            Err(e) => {
                // Keep the stale cache; try again next tick.
                self.metrics.watcher_errors.fetch_add(1, Ordering::Relaxed);
                warn!(target: "watcher", "failed to reload schedule store: {}", e);
            }
        }
    }
}
