use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared metrics for cross-task assistant monitoring
#[derive(Clone)]
pub struct AssistantMetrics {
    // Producer side
    pub utterances_recognized: Arc<AtomicU64>,

    // Dispatch loop
    pub commands_dispatched: Arc<AtomicU64>,
    pub commands_unmatched: Arc<AtomicU64>, // fell through to the fallback fan-out
    pub fallback_actions: Arc<AtomicU64>,   // fallback handlers that claimed the input
    pub handler_errors: Arc<AtomicU64>,

    // Multi-turn sessions
    pub sessions_started: Arc<AtomicU64>,
    pub sessions_completed: Arc<AtomicU64>,
    pub sessions_timed_out: Arc<AtomicU64>,

    // Paired-action executor
    pub paired_actions: Arc<AtomicU64>,
    pub speak_errors: Arc<AtomicU64>,
    pub effect_errors: Arc<AtomicU64>,

    // Watchers
    pub battery_alerts: Arc<AtomicU64>,
    pub plug_alerts: Arc<AtomicU64>,
    pub schedule_fires: Arc<AtomicU64>,
    pub alarm_fires: Arc<AtomicU64>,
    pub watcher_errors: Arc<AtomicU64>,

    // Activity indicators
    pub last_command_time: Arc<RwLock<Option<Instant>>>,
}

impl Default for AssistantMetrics {
    fn default() -> Self {
        Self {
            utterances_recognized: Arc::new(AtomicU64::new(0)),

            commands_dispatched: Arc::new(AtomicU64::new(0)),
            commands_unmatched: Arc::new(AtomicU64::new(0)),
            fallback_actions: Arc::new(AtomicU64::new(0)),
            handler_errors: Arc::new(AtomicU64::new(0)),

            sessions_started: Arc::new(AtomicU64::new(0)),
            sessions_completed: Arc::new(AtomicU64::new(0)),
            sessions_timed_out: Arc::new(AtomicU64::new(0)),

            paired_actions: Arc::new(AtomicU64::new(0)),
            speak_errors: Arc::new(AtomicU64::new(0)),
            effect_errors: Arc::new(AtomicU64::new(0)),

            battery_alerts: Arc::new(AtomicU64::new(0)),
            plug_alerts: Arc::new(AtomicU64::new(0)),
            schedule_fires: Arc::new(AtomicU64::new(0)),
            alarm_fires: Arc::new(AtomicU64::new(0)),
            watcher_errors: Arc::new(AtomicU64::new(0)),

            last_command_time: Arc::new(RwLock::new(None)),
        }
    }
}

impl AssistantMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_command(&self) {
        self.commands_dispatched.fetch_add(1, Ordering::Relaxed);
        *self.last_command_time.write() = Some(Instant::now());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            utterances_recognized: self.utterances_recognized.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_unmatched: self.commands_unmatched.load(Ordering::Relaxed),
            fallback_actions: self.fallback_actions.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            sessions_timed_out: self.sessions_timed_out.load(Ordering::Relaxed),
            paired_actions: self.paired_actions.load(Ordering::Relaxed),
            speak_errors: self.speak_errors.load(Ordering::Relaxed),
            effect_errors: self.effect_errors.load(Ordering::Relaxed),
            battery_alerts: self.battery_alerts.load(Ordering::Relaxed),
            plug_alerts: self.plug_alerts.load(Ordering::Relaxed),
            schedule_fires: self.schedule_fires.load(Ordering::Relaxed),
            alarm_fires: self.alarm_fires.load(Ordering::Relaxed),
            watcher_errors: self.watcher_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters, for the stats log line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub utterances_recognized: u64,
    pub commands_dispatched: u64,
    pub commands_unmatched: u64,
    pub fallback_actions: u64,
    pub handler_errors: u64,
    pub sessions_started: u64,
    pub sessions_completed: u64,
    pub sessions_timed_out: u64,
    pub paired_actions: u64,
    pub speak_errors: u64,
    pub effect_errors: u64,
    pub battery_alerts: u64,
    pub plug_alerts: u64,
    pub schedule_fires: u64,
    pub alarm_fires: u64,
    pub watcher_errors: u64,
}
