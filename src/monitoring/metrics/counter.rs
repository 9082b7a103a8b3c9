//! Monotonic counter

use super::atomic::AtomicF64;
use super::core::{Labels, Metric, MetricCore, MetricType, MetricValue};
use super::exemplar::{Exemplar, ExemplarStore};
use super::options::MetricOptions;
use chrono::{DateTime, Utc};

/// Non-negative, monotonically increasing `f64` total
#[derive(Debug)]
pub struct Counter {
    core: MetricCore,
    value: AtomicF64,
    exemplars: Option<ExemplarStore>,
}

impl Counter {
    pub fn new(name: &str, options: MetricOptions) -> Self {
        let core = MetricCore::from_options(name, MetricType::Counter, &options);
        Self::from_core(core, options.exemplar_capacity)
    }

    pub(crate) fn from_core(core: MetricCore, exemplar_capacity: Option<usize>) -> Self {
        Self {
            core,
            value: AtomicF64::default(),
            exemplars: exemplar_capacity.map(ExemplarStore::new),
        }
    }

    pub fn inc(&self) {
        self.add(1.0);
    }

    /// Negative (or NaN) deltas are ignored; a counter never decreases
    pub fn add(&self, delta: f64) {
        if delta.is_nan() || delta < 0.0 {
            return;
        }
        self.value.fetch_add(delta);
        self.core.touch();
    }

    /// Add `delta` and keep `exemplar` when exemplars are enabled
    pub fn add_with_exemplar(&self, delta: f64, exemplar: Exemplar) {
        if delta.is_nan() || delta < 0.0 {
            return;
        }
        self.add(delta);
        if let Some(store) = &self.exemplars {
            store.add(exemplar);
        }
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.core.timestamp()
    }

    pub fn exemplars(&self) -> Vec<Exemplar> {
        self.exemplars
            .as_ref()
            .map(ExemplarStore::get_all)
            .unwrap_or_default()
    }

    /// A new, independently stateful counter carrying `labels`
    pub fn with_labels(&self, labels: Labels) -> Counter {
        Counter::from_core(
            self.core.with_labels(labels),
            self.exemplars.as_ref().map(ExemplarStore::capacity),
        )
    }
}

impl Metric for Counter {
    fn core(&self) -> &MetricCore {
        &self.core
    }

    fn reset(&self) {
        self.value.store(0.0);
        if let Some(store) = &self.exemplars {
            store.clear();
        }
        self.core.clear_timestamp();
    }

    fn value(&self) -> MetricValue {
        MetricValue::Counter { value: self.get() }
    }
}
