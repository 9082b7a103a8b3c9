//! Metrics collector
//!
//! A [`MetricsCollector`] creates metrics lazily by fully-qualified name,
//! applies label and cardinality governance on creation, and hands
//! point-in-time samples to registered export renderers.

mod collector;
mod export;
mod getters;
mod manager;
mod registry;
mod types;


pub use collector::{MetricsCollector, default_collector};
pub use export::{Collector, ExportFormat, ExportRenderer};
#[cfg(test)]
pub use export::MockExportRenderer;
pub use registry::RegisteredMetric;
pub use types::{HealthReport, HealthStatus, MetricDescriptor, MetricSample, MetricsStats};
