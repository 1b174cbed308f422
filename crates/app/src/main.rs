use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use valet_app::collab::Collaborators;
use valet_app::config::ValetConfig;
use valet_app::net;
use valet_app::runtime::{self, RuntimeOptions};
use valet_app::speech::NoopRecognizer;
use valet_foundation::{real_clock, AppState, ShutdownHandler, StateManager};

#[derive(Parser, Debug)]
#[command(name = "valet", about = "Voice-controlled desktop assistant")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "VALET_CONFIG", default_value = "valet.toml")]
    config: PathBuf,

    /// Override the schedule store path
    #[arg(long)]
    schedule_file: Option<PathBuf>,

    /// Override the alarm store path
    #[arg(long)]
    alarm_file: Option<PathBuf>,

    /// Skip the startup connectivity probe
    #[arg(long)]
    offline_ok: bool,
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "valet.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

fn pick_line(lines: &[String]) -> &str {
    if lines.is_empty() {
        return "hello";
    }
    &lines[fastrand::usize(..lines.len())]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().map_err(|e| anyhow::anyhow!("logging init failed: {}", e))?;
    tracing::info!("Starting Valet assistant");

    let cli = Cli::parse();
    let mut config = ValetConfig::load(&cli.config)?;
    if let Some(path) = cli.schedule_file {
        config.schedule_file = path;
    }
    if let Some(path) = cli.alarm_file {
        config.alarm_file = path;
    }

    let state_manager = StateManager::new();
    let shutdown = ShutdownHandler::new().install().await;
    let collaborators = Collaborators::headless();

    // Connectivity gate: greet and start when online, raise a visual alert
    // and bail when not.
    if !cli.offline_ok {
        let url = config.probe_url.clone();
        let timeout = config.probe_timeout();
        let online = tokio::task::spawn_blocking(move || net::is_online(&url, timeout))
            .await
            .unwrap_or(false);
        if !online {
            let line = pick_line(&config.offline_lines);
            tracing::warn!("Connectivity probe failed, not starting");
            collaborators.notifier.notify(line);
            state_manager.transition(AppState::Stopping)?;
            state_manager.transition(AppState::Stopped)?;
            return Ok(());
        }
    }

    let greeting = pick_line(&config.greeting_lines).to_string();
    if let Err(e) = collaborators.speaker.speak(&greeting).await {
        tracing::warn!("greeting failed: {}", e);
    }

    let handle = runtime::start(RuntimeOptions {
        config,
        collaborators,
        recognizer: Box::new(NoopRecognizer),
        clock: real_clock(),
    });
    state_manager.transition(AppState::Listening)?;
    tracing::info!("Application state: {:?}", state_manager.current());

    // --- Main application loop ---
    let mut stats_interval = tokio::time::interval(Duration::from_secs(30));
    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            _ = stats_interval.tick() => {
                tracing::info!(snapshot = ?handle.metrics.snapshot(), "assistant running");
            }
        }
    }

    // --- Graceful shutdown ---
    state_manager.transition(AppState::Stopping)?;
    handle.shutdown().await;
    state_manager.transition(AppState::Stopped)?;
    tracing::info!("Shutdown complete");

    Ok(())
}
