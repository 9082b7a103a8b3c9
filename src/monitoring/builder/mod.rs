//! Collector builders
//!
//! Bridge external telemetry into a [`MetricsCollector`](crate::monitoring::collector::MetricsCollector),
//! either by polling a [`MetricSource`] ([`CollectorBuilder`]) or by
//! accepting pushed [`Snapshot`]s ([`PushableCollectorBuilder`]). Each
//! started builder owns exactly one background task.

mod applier;
mod background;
mod options;
mod pull;
mod push;
mod snapshot;
mod source;


pub use applier::BuilderStats;
pub use options::{BuilderOptions, COLLECTION_ERRORS_METRIC, ErrorHandler};
pub use pull::CollectorBuilder;
pub use push::PushableCollectorBuilder;
pub use snapshot::Snapshot;
pub use source::MetricSource;
