//! Point-in-time readings handed to a collector builder

use crate::monitoring::metrics::Labels;
use crate::utils::error::{MetricsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Raw values from an external source.
///
/// Counter values are cumulative totals as reported by the source; the
/// builder turns them into deltas. Distribution entries are individual
/// observations applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub counters: HashMap<String, f64>,
    #[serde(default)]
    pub gauges: HashMap<String, f64>,
    #[serde(default)]
    pub histograms: HashMap<String, Vec<f64>>,
    #[serde(default)]
    pub summaries: HashMap<String, Vec<f64>>,
    #[serde(default)]
    pub timers: HashMap<String, Vec<Duration>>,
    /// Labels attached to metrics created from this snapshot
    #[serde(default)]
    pub labels: Labels,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
            gauges: HashMap::new(),
            histograms: HashMap::new(),
            summaries: HashMap::new(),
            timers: HashMap::new(),
            labels: Labels::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_counter(mut self, name: impl Into<String>, total: f64) -> Self {
        self.counters.insert(name.into(), total);
        self
    }

    pub fn with_gauge(mut self, name: impl Into<String>, value: f64) -> Self {
        self.gauges.insert(name.into(), value);
        self
    }

    pub fn with_histogram(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.histograms.entry(name.into()).or_default().extend(values);
        self
    }

    pub fn with_summary(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.summaries.entry(name.into()).or_default().extend(values);
        self
    }

    pub fn with_timer(mut self, name: impl Into<String>, durations: Vec<Duration>) -> Self {
        self.timers.entry(name.into()).or_default().extend(durations);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
            && self.gauges.is_empty()
            && self.histograms.is_empty()
            && self.summaries.is_empty()
            && self.timers.is_empty()
    }

    /// Reject snapshots that cannot be applied as a whole
    pub fn validate(&self) -> Result<()> {
        let names = self
            .counters
            .keys()
            .chain(self.gauges.keys())
            .chain(self.histograms.keys())
            .chain(self.summaries.keys())
            .chain(self.timers.keys());
        for name in names {
            if name.trim().is_empty() {
                return Err(MetricsError::invalid_snapshot("metric name is empty"));
            }
        }

        for (name, value) in &self.counters {
            if !value.is_finite() || *value < 0.0 {
                return Err(MetricsError::invalid_snapshot(format!(
                    "counter '{}' has invalid total {}",
                    name, value
                )));
            }
        }
        for (name, value) in &self.gauges {
            if !value.is_finite() {
                return Err(MetricsError::invalid_snapshot(format!(
                    "gauge '{}' has non-finite value {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
