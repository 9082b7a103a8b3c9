//! Collector data types

use crate::monitoring::metrics::{Labels, MetricType, MetricValue};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Static description of a registered metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDescriptor {
    /// Fully-qualified name
    pub name: String,
    pub metric_type: MetricType,
    pub description: String,
    pub unit: String,
    /// Dynamic labels overlaid by const labels
    pub labels: Labels,
}

/// One gathered value, ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub descriptor: MetricDescriptor,
    pub value: MetricValue,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Aggregate view over a collector
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsStats {
    pub total_metrics: usize,
    pub counters: usize,
    pub gauges: usize,
    pub histograms: usize,
    pub summaries: usize,
    pub timers: usize,
    pub custom_collectors: usize,
    pub cardinality_current: usize,
    pub cardinality_limit: usize,
    pub cardinality_overflows: u64,
    pub uptime_seconds: u64,
    pub active: bool,
}

impl MetricsStats {
    pub(super) fn count(&mut self, metric_type: MetricType) {
        self.total_metrics += 1;
        match metric_type {
            MetricType::Counter => self.counters += 1,
            MetricType::Gauge => self.gauges += 1,
            MetricType::Histogram => self.histograms += 1,
            MetricType::Summary => self.summaries += 1,
            MetricType::Timer => self.timers += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of [`MetricsCollector::health`](super::MetricsCollector::health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub active: bool,
    /// `cardinality_current / cardinality_limit`
    pub cardinality_usage: f64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
