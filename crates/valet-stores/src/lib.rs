pub mod alarm;
pub mod schedule;
pub mod time_key;

pub use alarm::AlarmStore;
pub use schedule::{ScheduleEntry, ScheduleStore};
pub use time_key::TimeKey;
