//! Export seam: formats, renderers, custom collectors and gathering

use super::collector::MetricsCollector;
use super::types::{MetricDescriptor, MetricSample};
use crate::monitoring::metrics::Metric;
use crate::utils::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Wire formats a renderer can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Prometheus,
    Json,
    InfluxDb,
    StatsD,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prometheus => "prometheus",
            Self::Json => "json",
            Self::InfluxDb => "influxdb",
            Self::StatsD => "statsd",
        };
        f.write_str(name)
    }
}

/// Serializes gathered samples into one wire format
#[cfg_attr(test, mockall::automock)]
pub trait ExportRenderer: Send + Sync {
    fn render(&self, samples: &[MetricSample]) -> Result<String>;
}

/// External contributor of samples to [`MetricsCollector::gather`]
pub trait Collector: Send + Sync {
    fn name(&self) -> &str;

    fn collect(&self) -> Vec<MetricSample>;
}

pub(super) fn describe(metric: &dyn Metric) -> MetricDescriptor {
    let core = metric.core();
    MetricDescriptor {
        name: core.name().to_string(),
        metric_type: core.metric_type(),
        description: core.description().to_string(),
        unit: core.unit().to_string(),
        labels: core.all_labels(),
    }
}

pub(super) fn sample(metric: &dyn Metric) -> MetricSample {
    MetricSample {
        descriptor: describe(metric),
        value: metric.value(),
        timestamp: metric.core().timestamp(),
    }
}

impl MetricsCollector {
    /// Register the renderer used by [`export`](Self::export) for `format`, replacing any previous one
    pub fn register_renderer(&self, format: ExportFormat, renderer: Arc<dyn ExportRenderer>) {
        debug!(format = %format, "Registering export renderer");
        self.renderers.write().insert(format, renderer);
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let renderer = self
            .renderers
            .read()
            .get(&format)
            .cloned()
            .ok_or(MetricsError::UnsupportedFormat(format))?;
        renderer.render(&self.gather())
    }

    /// Point-in-time samples of every registered metric, sorted by name,
    /// followed by the samples of custom collectors
    pub fn gather(&self) -> Vec<MetricSample> {
        let mut samples: Vec<MetricSample> = self
            .metrics
            .read()
            .values()
            .map(|registration| sample(registration.metric.as_metric()))
            .collect();
        samples.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name));

        let collectors: Vec<Arc<dyn Collector>> =
            self.collectors.read().values().cloned().collect();
        for collector in collectors {
            samples.extend(collector.collect());
        }
        samples
    }
}
