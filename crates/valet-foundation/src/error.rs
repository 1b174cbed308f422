use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Speech subsystem error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Power probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),

    #[error("Transient error, will retry: {0}")]
    Transient(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid time key: {0:?}")]
    InvalidTimeKey(String),
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("Speech engine unavailable")]
    Unavailable,

    #[error("No speech data for {duration:?}")]
    NoDataTimeout { duration: Duration },
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("No battery present on this system")]
    NoBattery,

    #[error("Probe read failed: {0}")]
    Read(String),
}

#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    Retry { max_attempts: u32, delay: Duration },
    Ignore,
    Restart,
    Fatal,
}

impl AppError {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            // A failed store read/write or probe read skips the current
            // poll tick; the loop continues with stale cached state.
            AppError::Store(_) | AppError::Probe(_) => RecoveryStrategy::Ignore,
            AppError::Speech(SpeechError::Unavailable) => RecoveryStrategy::Retry {
                max_attempts: 5,
                delay: Duration::from_secs(2),
            },
            AppError::Config(_) | AppError::Fatal(_) | AppError::ShutdownRequested => {
                RecoveryStrategy::Fatal
            }
            _ => RecoveryStrategy::Restart,
        }
    }
}
