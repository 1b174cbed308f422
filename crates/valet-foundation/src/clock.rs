//! # Clock Abstraction for Test Determinism
//!
//! The schedule and alarm watchers compare formatted wall-clock time against
//! persisted time keys. A Clock trait with a virtual implementation lets
//! those comparisons run deterministically under test.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn local_now(&self) -> NaiveDateTime;
}

/// Real wall-clock implementation
pub struct RealClock;

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RealClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Virtual clock for deterministic testing
pub struct TestClock {
    current: Mutex<NaiveDateTime>,
}

impl TestClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Advance the virtual clock by the specified duration
    pub fn advance(&self, duration: Duration) {
        let mut now = self.current.lock();
        *now += ChronoDuration::from_std(duration).expect("duration out of range");
    }

    /// Set the virtual clock to a specific time
    pub fn set(&self, time: NaiveDateTime) {
        *self.current.lock() = time;
    }
}

impl Clock for TestClock {
    fn local_now(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}

/// Thread-safe clock that can be shared across tasks
pub type SharedClock = Arc<dyn Clock>;

/// Create a real wall clock
pub fn real_clock() -> SharedClock {
    Arc::new(RealClock::new())
}
