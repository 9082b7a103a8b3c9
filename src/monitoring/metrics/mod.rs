//! Metric primitives
//!
//! Counters, gauges and histogram buckets are lock-free (CAS on `f64` bit
//! patterns); summaries use a mutex around their quantile sketch.

mod atomic;
mod bounded;
mod core;
mod counter;
mod exemplar;
mod gauge;
mod histogram;
mod options;
mod summary;
mod timer;


pub use self::core::{
    BucketCount, HistogramSnapshot, Labels, Metric, MetricCore, MetricIdentity, MetricType,
    MetricValue, QuantileValue, SummarySnapshot,
};
pub(crate) use self::core::fully_qualified_name;
pub use atomic::AtomicF64;
pub use counter::Counter;
pub use exemplar::{DEFAULT_EXEMPLAR_CAPACITY, Exemplar, ExemplarStore};
pub use gauge::Gauge;
pub use histogram::{
    DEFAULT_BUCKETS, Histogram, default_buckets, exponential_buckets, linear_buckets,
};
pub use options::MetricOptions;
pub use summary::{Objective, Summary, default_objectives};
pub use timer::{DEFAULT_TIMER_BUCKETS_MS, Timer, TimerGuard};
