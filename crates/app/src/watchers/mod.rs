//! Background watchers.
//!
//! Three independent poll loops sharing one shape: tick on a fixed
//! interval, compare current state against the cached prior state, fire a
//! paired action when the condition holds, and keep going on errors with
//! stale cached state. They never touch the transcript slot.

pub mod alarm;
pub mod battery;
pub mod schedule;

pub use alarm::AlarmWatcher;
pub use battery::{BatteryBand, BatteryWatcher, PlugWatcher};
pub use schedule::ScheduleWatcher;
