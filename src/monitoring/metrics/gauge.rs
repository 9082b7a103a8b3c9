//! Gauge: a value that can go up and down

use super::atomic::AtomicF64;
use super::core::{Labels, Metric, MetricCore, MetricType, MetricValue};
use super::options::MetricOptions;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Gauge {
    core: MetricCore,
    value: AtomicF64,
}

impl Gauge {
    pub fn new(name: &str, options: MetricOptions) -> Self {
        Self::from_core(MetricCore::from_options(name, MetricType::Gauge, &options))
    }

    pub(crate) fn from_core(core: MetricCore) -> Self {
        Self {
            core,
            value: AtomicF64::default(),
        }
    }

    pub fn set(&self, value: f64) {
        self.value.store(value);
        self.core.touch();
    }

    pub fn inc(&self) {
        self.add(1.0);
    }

    pub fn dec(&self) {
        self.add(-1.0);
    }

    pub fn add(&self, delta: f64) {
        self.value.fetch_add(delta);
        self.core.touch();
    }

    pub fn sub(&self, delta: f64) {
        self.add(-delta);
    }

    /// Set to the current Unix time in seconds
    pub fn set_to_current_time(&self) {
        let now = Utc::now();
        self.set(now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.core.timestamp()
    }

    pub fn with_labels(&self, labels: Labels) -> Gauge {
        Gauge::from_core(self.core.with_labels(labels))
    }
}

impl Metric for Gauge {
    fn core(&self) -> &MetricCore {
        &self.core
    }

    fn reset(&self) {
        self.value.store(0.0);
        self.core.clear_timestamp();
    }

    fn value(&self) -> MetricValue {
        MetricValue::Gauge { value: self.get() }
    }
}
