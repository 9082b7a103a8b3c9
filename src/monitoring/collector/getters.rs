//! Read access to registered metrics

use super::collector::MetricsCollector;
use super::export::describe;
use super::registry::RegisteredMetric;
use super::types::{MetricDescriptor, MetricsStats};
use crate::monitoring::metrics::{BucketCount, MetricType};
use crate::utils::error::{MetricsError, Result};

impl MetricsCollector {
    /// Descriptors of every registered metric, sorted by name
    pub fn list_metrics(&self) -> Vec<MetricDescriptor> {
        let mut descriptors: Vec<MetricDescriptor> = self
            .metrics
            .read()
            .values()
            .map(|registration| describe(registration.metric.as_metric()))
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    pub fn list_metrics_by_type(&self, metric_type: MetricType) -> Vec<MetricDescriptor> {
        self.list_metrics()
            .into_iter()
            .filter(|d| d.metric_type == metric_type)
            .collect()
    }

    /// Look up a metric by fully-qualified name
    pub fn get(&self, name: &str) -> Option<RegisteredMetric> {
        self.metrics.read().get(name).map(|r| r.metric.clone())
    }

    pub fn describe(&self, name: &str) -> Option<MetricDescriptor> {
        self.metrics
            .read()
            .get(name)
            .map(|r| describe(r.metric.as_metric()))
    }

    /// Bucket counts of a histogram or timer
    pub fn buckets(&self, name: &str) -> Result<Vec<BucketCount>> {
        match self.get(name) {
            Some(RegisteredMetric::Histogram(h)) => Ok(h.buckets()),
            Some(RegisteredMetric::Timer(t)) => Ok(t.buckets()),
            Some(other) => Err(MetricsError::TypeMismatch {
                name: name.to_string(),
                existing: other.metric_type(),
                requested: MetricType::Histogram,
            }),
            None => Err(MetricsError::MetricNotFound(name.to_string())),
        }
    }

    pub fn stats(&self) -> MetricsStats {
        let mut stats = MetricsStats::default();
        for registration in self.metrics.read().values() {
            stats.count(registration.metric.metric_type());
        }
        stats.custom_collectors = self.collectors.read().len();
        stats.cardinality_current = self.cardinality.current();
        stats.cardinality_limit = self.cardinality.limit();
        stats.cardinality_overflows = self.cardinality.overflow_count();
        stats.uptime_seconds = self.start_time.elapsed().as_secs();
        stats.active = self.is_active();
        stats
    }
}
