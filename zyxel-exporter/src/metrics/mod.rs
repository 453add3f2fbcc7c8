//! Metric record model and exposition-format rendering.

mod record;
mod render;

pub use record::{MetricKind, MetricRecord, MetricValue};
pub use render::{render, render_records};
