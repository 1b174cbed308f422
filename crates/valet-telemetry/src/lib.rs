pub mod metrics;

pub use metrics::{AssistantMetrics, MetricsSnapshot};
