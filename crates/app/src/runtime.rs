//! Runtime wiring: builds the slot, spawns the producer, the dispatch loop
//! and the three watchers, and hands back a handle that can tear the whole
//! set down.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use valet_foundation::{real_clock, SharedClock};
use valet_stores::{AlarmStore, ScheduleStore};
use valet_telemetry::AssistantMetrics;

use crate::collab::Collaborators;
use crate::config::ValetConfig;
use crate::dispatch::{ActionExecutor, DispatchLoop, HandlerContext};
use crate::speech::{NoopRecognizer, RecognitionProducer, Recognizer};
use crate::transcript::TranscriptSlot;
use crate::watchers::{AlarmWatcher, BatteryWatcher, PlugWatcher, ScheduleWatcher};

/// Everything the runtime needs to start
pub struct RuntimeOptions {
    pub config: ValetConfig,
    pub collaborators: Collaborators,
    pub recognizer: Box<dyn Recognizer>,
    pub clock: SharedClock,
}

impl RuntimeOptions {
    /// No-op collaborators and a silent recognizer; watchers and dispatch
    /// still run, effects only hit the log.
    pub fn headless(config: ValetConfig) -> Self {
        Self {
            config,
            collaborators: Collaborators::headless(),
            recognizer: Box::new(NoopRecognizer),
            clock: real_clock(),
        }
    }
}

/// Handle to the running assistant
pub struct AppHandle {
    pub metrics: Arc<AssistantMetrics>,
    slot: Arc<TranscriptSlot>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl AppHandle {
    /// The shared transcript slot, for callers that feed it directly
    /// (tests, demos, an external recognizer bridge).
    pub fn transcript(&self) -> Arc<TranscriptSlot> {
        Arc::clone(&self.slot)
    }

    /// Gracefully stop every task and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Shutting down valet runtime...");
        let _ = self.shutdown_tx.send(true);

        // The producer may be parked inside a recognizer with nothing to
        // say; abort breaks it out. Everyone else exits on the signal.
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            let _ = handle.await;
        }

        info!("Valet runtime shutdown complete");
    }
}

/// Wire up and start the full pipeline.
pub fn start(options: RuntimeOptions) -> AppHandle {
    let RuntimeOptions {
        config,
        collaborators,
        recognizer,
        clock,
    } = options;

    let metrics = Arc::new(AssistantMetrics::new());
    let slot = Arc::new(TranscriptSlot::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let executor = ActionExecutor::new(
        Arc::clone(&collaborators.speaker),
        Arc::clone(&collaborators.notifier),
        Arc::clone(&metrics),
    );

    let schedule_store = ScheduleStore::new(&config.schedule_file);
    let alarm_store = AlarmStore::new(&config.alarm_file);

    let mut handles = Vec::new();

    // --- Recognition producer ---
    let producer = RecognitionProducer::new(
        recognizer,
        Arc::clone(&slot),
        Arc::clone(&metrics),
        shutdown_rx.clone(),
    );
    handles.push(producer.spawn());
    info!("Recognition producer started");

    // --- Dispatch loop ---
    let ctx = HandlerContext {
        executor: executor.clone(),
        collab: collaborators.clone(),
        slot: Arc::clone(&slot),
        schedule: schedule_store.clone(),
        alarms: alarm_store.clone(),
        session_timeout: config.session_timeout(),
        metrics: Arc::clone(&metrics),
    };
    handles.push(DispatchLoop::new(ctx, shutdown_rx.clone()).spawn());
    info!("Dispatch loop started");

    // --- Background watchers ---
    handles.push(
        BatteryWatcher::new(
            Arc::clone(&collaborators.power),
            executor.clone(),
            Arc::clone(&metrics),
            config.battery_interval(),
            shutdown_rx.clone(),
        )
        .spawn(),
    );
    handles.push(
        PlugWatcher::new(
            Arc::clone(&collaborators.power),
            executor.clone(),
            Arc::clone(&metrics),
            config.plug_interval(),
            shutdown_rx.clone(),
        )
        .spawn(),
    );
    handles.push(
        ScheduleWatcher::new(
            schedule_store,
            executor.clone(),
            Arc::clone(&clock),
            Arc::clone(&metrics),
            config.schedule_interval(),
            shutdown_rx.clone(),
        )
        .spawn(),
    );
    handles.push(
        AlarmWatcher::new(
            alarm_store,
            executor,
            clock,
            Arc::clone(&metrics),
            config.alarm_interval(),
            shutdown_rx,
        )
        .spawn(),
    );
    info!("Background watchers started");

    AppHandle {
        metrics,
        slot,
        shutdown_tx,
        handles,
    }
}
