//! Per-metric creation options

use super::core::Labels;
use super::summary::Objective;

/// Options applied when a metric is created.
///
/// Fields left unset fall back to the collector's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricOptions {
    pub namespace: Option<String>,
    pub subsystem: Option<String>,
    pub description: String,
    pub unit: String,
    pub labels: Labels,
    pub const_labels: Labels,
    /// Histogram/timer bucket upper bounds
    pub buckets: Option<Vec<f64>>,
    /// Summary quantile objectives
    pub objectives: Option<Vec<Objective>>,
    /// Summary raw-value ring size, `None` for unlimited
    pub buffer_cap: Option<usize>,
    /// Exemplar ring size, `None` disables exemplars
    pub exemplar_capacity: Option<usize>,
}

impl MetricOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = Some(subsystem.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels.extend(labels);
        self
    }

    pub fn with_const_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.const_labels.insert(key.into(), value.into());
        self
    }

    pub fn with_buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = Some(buckets);
        self
    }

    pub fn with_objectives(mut self, objectives: Vec<Objective>) -> Self {
        self.objectives = Some(objectives);
        self
    }

    pub fn with_buffer_cap(mut self, cap: usize) -> Self {
        self.buffer_cap = Some(cap);
        self
    }

    pub fn with_exemplars(mut self, capacity: usize) -> Self {
        self.exemplar_capacity = Some(capacity);
        self
    }
}
