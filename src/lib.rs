//! # telemetry-kit
//!
//! Concurrency-safe metric primitives with label governance and
//! collector builders for external telemetry sources.
//!
//! ## Features
//!
//! - **Lock-free primitives**: counters, gauges and histogram buckets update via CAS
//! - **Streaming quantiles**: summaries backed by an error-bounded sketch
//! - **Exemplars**: trace-linked samples on counters, histograms and timers
//! - **Governance**: label validation, sanitization and a cardinality ceiling
//! - **Collector builders**: poll a [`MetricSource`] or push [`Snapshot`]s
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use telemetry_kit::{MetricOptions, MetricsCollector, MetricsConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = MetricsCollector::new(MetricsConfig::default())?;
//!
//!     let requests = collector.counter(
//!         "http_requests_total",
//!         MetricOptions::new().with_label("method", "GET"),
//!     )?;
//!     requests.inc();
//!
//!     let latency = collector.timer("http_request_duration", MetricOptions::new())?;
//!     let _guard = latency.start_timer();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod monitoring;
pub mod utils;

pub use config::{MetricsConfig, Validate};
pub use monitoring::builder::{
    BuilderOptions, BuilderStats, CollectorBuilder, MetricSource, PushableCollectorBuilder,
    Snapshot,
};
pub use monitoring::collector::{
    Collector, ExportFormat, ExportRenderer, HealthReport, HealthStatus, MetricDescriptor,
    MetricSample, MetricsCollector, MetricsStats, RegisteredMetric, default_collector,
};
pub use monitoring::facade::{
    Exporter, Factory, Lifecycle, Manager, Metrics, Registry, Repository,
};
pub use monitoring::governance::{
    CardinalityTracker, LabelError, LabelErrorReason, LabelGovernor, LabelPolicy,
};
pub use monitoring::metrics::{
    Counter, Exemplar, ExemplarStore, Gauge, Histogram, Labels, Metric, MetricOptions,
    MetricType, MetricValue, Objective, Summary, Timer, TimerGuard, default_buckets,
    exponential_buckets, linear_buckets,
};
pub use utils::error::{MetricsError, Result};
pub use utils::logging::{LogFormat, init_tracing};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
