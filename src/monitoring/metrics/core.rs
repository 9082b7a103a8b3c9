//! Shared metric metadata: identity, labels and last-update timestamp

use super::options::MetricOptions;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Label set, kept sorted by key
pub type Labels = BTreeMap<String, String>;

/// Kind of metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Timer,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
            MetricType::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace, subsystem and name of a metric
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MetricIdentity {
    namespace: String,
    subsystem: String,
    name: String,
    metric_type: MetricType,
}

impl MetricIdentity {
    pub fn new(
        namespace: impl Into<String>,
        subsystem: impl Into<String>,
        name: impl Into<String>,
        metric_type: MetricType,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            subsystem: subsystem.into(),
            name: name.into(),
            metric_type,
        }
    }

    /// Non-empty parts of namespace, subsystem and name joined with `_`
    pub fn fully_qualified_name(&self) -> String {
        fully_qualified_name(&self.namespace, &self.subsystem, &self.name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }
}

pub(crate) fn fully_qualified_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Metadata and label state shared by every primitive
#[derive(Debug)]
pub struct MetricCore {
    identity: MetricIdentity,
    fq_name: String,
    description: String,
    unit: String,
    labels: Labels,
    const_labels: ArcSwap<Labels>,
    /// Unix nanoseconds of the last update, 0 when never updated
    updated_at: AtomicI64,
}

impl MetricCore {
    pub fn new(
        identity: MetricIdentity,
        description: impl Into<String>,
        unit: impl Into<String>,
        labels: Labels,
        const_labels: Labels,
    ) -> Self {
        let fq_name = identity.fully_qualified_name();
        Self {
            identity,
            fq_name,
            description: description.into(),
            unit: unit.into(),
            labels,
            const_labels: ArcSwap::from_pointee(const_labels),
            updated_at: AtomicI64::new(0),
        }
    }

    pub(crate) fn from_options(name: &str, metric_type: MetricType, options: &MetricOptions) -> Self {
        let identity = MetricIdentity::new(
            options.namespace.clone().unwrap_or_default(),
            options.subsystem.clone().unwrap_or_default(),
            name,
            metric_type,
        );
        Self::new(
            identity,
            options.description.clone(),
            options.unit.clone(),
            options.labels.clone(),
            options.const_labels.clone(),
        )
    }

    /// A fresh core sharing static metadata, carrying `labels` as its dynamic labels
    pub(crate) fn with_labels(&self, labels: Labels) -> Self {
        Self {
            identity: self.identity.clone(),
            fq_name: self.fq_name.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            labels,
            const_labels: ArcSwap::new(self.const_labels.load_full()),
            updated_at: AtomicI64::new(0),
        }
    }

    pub fn identity(&self) -> &MetricIdentity {
        &self.identity
    }

    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.fq_name
    }

    pub fn metric_type(&self) -> MetricType {
        self.identity.metric_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Dynamic labels set at creation
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn const_labels(&self) -> Arc<Labels> {
        self.const_labels.load_full()
    }

    /// Replaces the const label set; the previous set is discarded, not merged
    pub fn set_const_labels(&self, labels: Labels) {
        self.const_labels.store(Arc::new(labels));
    }

    /// Dynamic labels overlaid by const labels
    pub fn all_labels(&self) -> Labels {
        let mut merged = self.labels.clone();
        merged.extend(
            self.const_labels
                .load()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    #[inline]
    pub(crate) fn touch(&self) {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        self.updated_at.store(now, Ordering::Release);
    }

    pub(crate) fn clear_timestamp(&self) {
        self.updated_at.store(0, Ordering::Release);
    }

    /// Time of the last update, `None` if never updated or reset since
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.updated_at.load(Ordering::Acquire) {
            0 => None,
            nanos => Some(DateTime::from_timestamp_nanos(nanos)),
        }
    }
}

/// A single histogram bucket: non-cumulative count of observations `<= upper_bound`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketCount {
    pub upper_bound: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSnapshot {
    pub buckets: Vec<BucketCount>,
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileValue {
    pub quantile: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySnapshot {
    pub quantiles: Vec<QuantileValue>,
    pub count: u64,
    pub sum: f64,
}

/// Point-in-time value of any metric, for exporters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricValue {
    Counter { value: f64 },
    Gauge { value: f64 },
    Histogram(HistogramSnapshot),
    Summary(SummarySnapshot),
    /// Timer distributions are reported in milliseconds
    Timer(HistogramSnapshot),
}

/// Behaviour common to all primitives
pub trait Metric: Send + Sync + fmt::Debug {
    fn core(&self) -> &MetricCore;

    /// Zero the metric; it stays registered
    fn reset(&self);

    fn value(&self) -> MetricValue;

    fn metric_type(&self) -> MetricType {
        self.core().metric_type()
    }
}
