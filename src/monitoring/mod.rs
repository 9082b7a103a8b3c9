//! Metrics instrumentation
//!
//! - [`metrics`]: counter, gauge, histogram, summary and timer primitives
//! - [`governance`]: label validation and cardinality limits
//! - [`collector`]: the [`MetricsCollector`](collector::MetricsCollector) factory and registry
//! - [`facade`]: capability traits composed into [`Metrics`](facade::Metrics)
//! - [`builder`]: pull and push bridges from external sources

pub mod builder;
pub mod collector;
pub mod facade;
pub mod governance;
pub mod metrics;
