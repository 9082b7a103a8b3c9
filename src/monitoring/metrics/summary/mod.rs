//! Streaming-quantile summary
//!
//! Quantiles come from a targeted sketch whose rank error is bounded per
//! objective. Min, max and standard deviation are exact over a ring of raw
//! observations capped at `buffer_cap` (unbounded when unset), so with a cap
//! they describe the most recent `buffer_cap` observations only.

mod sketch;


use super::bounded::BoundedPush;
use super::core::{
    Labels, Metric, MetricCore, MetricType, MetricValue, QuantileValue, SummarySnapshot,
};
use super::options::MetricOptions;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sketch::QuantileSketch;
use std::collections::VecDeque;

/// A tracked quantile and its allowed rank error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub quantile: f64,
    pub error: f64,
}

impl Objective {
    pub const fn new(quantile: f64, error: f64) -> Self {
        Self { quantile, error }
    }
}

pub fn default_objectives() -> Vec<Objective> {
    vec![
        Objective::new(0.5, 0.05),
        Objective::new(0.9, 0.01),
        Objective::new(0.99, 0.001),
    ]
}

#[derive(Debug)]
struct SummaryState {
    sketch: QuantileSketch,
    raw: VecDeque<f64>,
    sum: f64,
    count: u64,
}

#[derive(Debug)]
pub struct Summary {
    core: MetricCore,
    objectives: Vec<Objective>,
    buffer_cap: Option<usize>,
    state: Mutex<SummaryState>,
}

impl Summary {
    pub fn new(name: &str, options: MetricOptions) -> Self {
        let core = MetricCore::from_options(name, MetricType::Summary, &options);
        Self::from_core(core, options.objectives, options.buffer_cap)
    }

    pub(crate) fn from_core(
        core: MetricCore,
        objectives: Option<Vec<Objective>>,
        buffer_cap: Option<usize>,
    ) -> Self {
        let mut objectives = objectives
            .filter(|o| !o.is_empty())
            .unwrap_or_else(default_objectives);
        objectives.sort_by(|a, b| a.quantile.total_cmp(&b.quantile));
        Self {
            core,
            state: Mutex::new(SummaryState {
                sketch: QuantileSketch::new(objectives.clone()),
                raw: VecDeque::new(),
                sum: 0.0,
                count: 0,
            }),
            objectives,
            buffer_cap,
        }
    }

    pub fn observe(&self, value: f64) {
        {
            let mut state = self.state.lock();
            state.sketch.insert(value);
            state.raw.push_bounded(value, self.buffer_cap);
            state.sum += value;
            state.count += 1;
        }
        self.core.touch();
    }

    /// Sketch estimate for `q`, clamped to `[0, 1]`; 0 when empty
    pub fn quantile(&self, q: f64) -> f64 {
        let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
        self.state.lock().sketch.query(q)
    }

    /// Estimates for every configured objective
    pub fn quantiles(&self) -> Vec<QuantileValue> {
        let mut state = self.state.lock();
        self.objectives
            .iter()
            .map(|objective| QuantileValue {
                quantile: objective.quantile,
                value: state.sketch.query(objective.quantile),
            })
            .collect()
    }

    pub fn count(&self) -> u64 {
        self.state.lock().count
    }

    pub fn sum(&self) -> f64 {
        self.state.lock().sum
    }

    pub fn mean(&self) -> f64 {
        let state = self.state.lock();
        match state.count {
            0 => 0.0,
            count => state.sum / count as f64,
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.state.lock().raw.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.state.lock().raw.iter().copied().reduce(f64::max)
    }

    /// Population standard deviation of the retained raw observations
    pub fn stddev(&self) -> f64 {
        let state = self.state.lock();
        let n = state.raw.len();
        if n == 0 {
            return 0.0;
        }
        let mean = state.raw.iter().sum::<f64>() / n as f64;
        let variance = state
            .raw
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        variance.sqrt()
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.core.timestamp()
    }

    pub fn with_labels(&self, labels: Labels) -> Summary {
        Summary::from_core(
            self.core.with_labels(labels),
            Some(self.objectives.clone()),
            self.buffer_cap,
        )
    }
}

impl Metric for Summary {
    fn core(&self) -> &MetricCore {
        &self.core
    }

    fn reset(&self) {
        {
            let mut state = self.state.lock();
            state.sketch.reset();
            state.raw.clear();
            state.sum = 0.0;
            state.count = 0;
        }
        self.core.clear_timestamp();
    }

    fn value(&self) -> MetricValue {
        let quantiles = self.quantiles();
        let state = self.state.lock();
        MetricValue::Summary(SummarySnapshot {
            quantiles,
            count: state.count,
            sum: state.sum,
        })
    }
}
