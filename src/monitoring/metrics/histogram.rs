//! Bucketed distribution
//!
//! Quantiles are bucket-edge estimates: `quantile(q)` returns the upper bound
//! of the bucket holding the `q`-th observation, never an interpolation inside
//! the bucket. Precision is therefore bounded by bucket width. `stddev` is
//! estimated from bucket midpoints and is biased.

use super::atomic::AtomicF64;
use super::core::{BucketCount, HistogramSnapshot, Labels, Metric, MetricCore, MetricType, MetricValue};
use super::exemplar::{Exemplar, ExemplarStore};
use super::options::MetricOptions;
use crate::utils::error::{MetricsError, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default bucket upper bounds, tuned for request latencies in seconds
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

pub fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}

/// `count` buckets starting at `start`, each `width` wide
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(MetricsError::InvalidBuckets(
            "linear buckets need a positive count".to_string(),
        ));
    }
    if width.is_nan() || width <= 0.0 || !start.is_finite() {
        return Err(MetricsError::InvalidBuckets(format!(
            "linear buckets need a finite start and positive width, got start={start} width={width}"
        )));
    }
    Ok((0..count).map(|i| start + width * i as f64).collect())
}

/// `count` buckets starting at `start`, each `factor` times the previous
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(MetricsError::InvalidBuckets(
            "exponential buckets need a positive count".to_string(),
        ));
    }
    if start.is_nan() || start <= 0.0 || factor.is_nan() || factor <= 1.0 {
        return Err(MetricsError::InvalidBuckets(format!(
            "exponential buckets need start > 0 and factor > 1, got start={start} factor={factor}"
        )));
    }
    Ok((0..count)
        .scan(start, |next, _| {
            let bound = *next;
            *next *= factor;
            Some(bound)
        })
        .collect())
}

/// Sort, dedup and strip the implicit +Inf bound
pub(crate) fn normalize_buckets(mut buckets: Vec<f64>) -> Result<Vec<f64>> {
    if buckets.iter().any(|b| b.is_nan()) {
        return Err(MetricsError::InvalidBuckets(
            "bucket bounds must not be NaN".to_string(),
        ));
    }
    buckets.retain(|b| *b != f64::INFINITY);
    buckets.sort_by(f64::total_cmp);
    buckets.dedup();
    if buckets.is_empty() {
        return Err(MetricsError::InvalidBuckets(
            "at least one finite bucket bound is required".to_string(),
        ));
    }
    Ok(buckets)
}

#[derive(Debug)]
pub struct Histogram {
    core: MetricCore,
    bounds: Box<[f64]>,
    /// One slot per bound plus the trailing +Inf bucket
    counts: Box<[AtomicU64]>,
    sum: AtomicF64,
    min: AtomicF64,
    max: AtomicF64,
    exemplars: Option<ExemplarStore>,
}

impl Histogram {
    pub fn new(name: &str, options: MetricOptions) -> Result<Self> {
        let buckets = options.buckets.clone().unwrap_or_else(default_buckets);
        let core = MetricCore::from_options(name, MetricType::Histogram, &options);
        Self::from_core(core, buckets, options.exemplar_capacity)
    }

    pub(crate) fn from_core(
        core: MetricCore,
        buckets: Vec<f64>,
        exemplar_capacity: Option<usize>,
    ) -> Result<Self> {
        let bounds = normalize_buckets(buckets)?;
        let counts = (0..=bounds.len())
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            core,
            bounds: bounds.into_boxed_slice(),
            counts,
            sum: AtomicF64::new(0.0),
            min: AtomicF64::new(f64::INFINITY),
            max: AtomicF64::new(f64::NEG_INFINITY),
            exemplars: exemplar_capacity.map(ExemplarStore::new),
        })
    }

    /// Record one observation; out-of-range values land in the +Inf bucket
    pub fn observe(&self, value: f64) {
        let index = if value.is_nan() {
            self.bounds.len()
        } else {
            self.bounds.partition_point(|bound| *bound < value)
        };
        if let Some(bucket) = self.counts.get(index) {
            bucket.fetch_add(1, Ordering::Relaxed);
        }
        if !value.is_nan() {
            self.sum.fetch_add(value);
            self.min.fetch_min(value);
            self.max.fetch_max(value);
        }
        self.core.touch();
    }

    pub fn observe_with_exemplar(&self, value: f64, exemplar: Exemplar) {
        self.observe(value);
        if let Some(store) = &self.exemplars {
            store.add(exemplar);
        }
    }

    /// Total observations, always equal to the sum of bucket counts
    pub fn count(&self) -> u64 {
        self.counts
            .iter()
            .map(|bucket| bucket.load(Ordering::Relaxed))
            .sum()
    }

    pub fn sum(&self) -> f64 {
        self.sum.load()
    }

    pub fn mean(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            count => self.sum() / count as f64,
        }
    }

    pub fn min(&self) -> Option<f64> {
        let (min, max) = (self.min.load(), self.max.load());
        (min <= max).then_some(min)
    }

    pub fn max(&self) -> Option<f64> {
        let (min, max) = (self.min.load(), self.max.load());
        (min <= max).then_some(max)
    }

    /// Upper bound of the bucket containing rank `q * count`.
    ///
    /// For the +Inf bucket the observed maximum is returned. Empty histograms
    /// report 0.
    pub fn quantile(&self, q: f64) -> f64 {
        let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
        let counts: Vec<u64> = self
            .counts
            .iter()
            .map(|bucket| bucket.load(Ordering::Relaxed))
            .collect();
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return 0.0;
        }

        let rank = q * total as f64;
        let mut cumulative = 0u64;
        for (index, count) in counts.iter().enumerate() {
            cumulative += count;
            if cumulative > 0 && cumulative as f64 >= rank {
                return self.upper_bound(index);
            }
        }
        self.upper_bound(self.bounds.len())
    }

    /// `p` in `[0, 100]`
    pub fn percentile(&self, p: f64) -> f64 {
        self.quantile(p / 100.0)
    }

    /// Standard deviation estimated from bucket midpoints
    pub fn stddev(&self) -> f64 {
        let Some(min) = self.min() else {
            return 0.0;
        };
        let total = self.count();
        if total == 0 {
            return 0.0;
        }
        let mean = self.mean();

        let variance = self
            .counts
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let count = bucket.load(Ordering::Relaxed);
                if count == 0 {
                    return 0.0;
                }
                let lower = match index {
                    0 => min.min(self.bounds.first().copied().unwrap_or(min)),
                    _ => self.bounds.get(index - 1).copied().unwrap_or(min),
                };
                let upper = self.upper_bound(index);
                let midpoint = (lower + upper) / 2.0;
                count as f64 * (midpoint - mean).powi(2)
            })
            .sum::<f64>()
            / total as f64;
        variance.sqrt()
    }

    /// Per-bucket (non-cumulative) counts, ending with the +Inf bucket
    pub fn buckets(&self) -> Vec<BucketCount> {
        self.counts
            .iter()
            .enumerate()
            .map(|(index, bucket)| BucketCount {
                upper_bound: self.bounds.get(index).copied().unwrap_or(f64::INFINITY),
                count: bucket.load(Ordering::Relaxed),
            })
            .collect()
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
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

    pub fn with_labels(&self, labels: Labels) -> Histogram {
        Histogram {
            core: self.core.with_labels(labels),
            bounds: self.bounds.clone(),
            counts: (0..self.counts.len())
                .map(|_| AtomicU64::new(0))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
            sum: AtomicF64::new(0.0),
            min: AtomicF64::new(f64::INFINITY),
            max: AtomicF64::new(f64::NEG_INFINITY),
            exemplars: self
                .exemplars
                .as_ref()
                .map(|store| ExemplarStore::new(store.capacity())),
        }
    }

    pub(crate) fn snapshot(&self) -> HistogramSnapshot {
        let buckets = self.buckets();
        HistogramSnapshot {
            count: buckets.iter().map(|b| b.count).sum(),
            buckets,
            sum: self.sum(),
            min: self.min(),
            max: self.max(),
        }
    }

    pub(crate) fn clear(&self) {
        for bucket in self.counts.iter() {
            bucket.store(0, Ordering::Relaxed);
        }
        self.sum.store(0.0);
        self.min.store(f64::INFINITY);
        self.max.store(f64::NEG_INFINITY);
        if let Some(store) = &self.exemplars {
            store.clear();
        }
        self.core.clear_timestamp();
    }

    /// For the +Inf bucket, the observed maximum (never below the last finite bound)
    fn upper_bound(&self, index: usize) -> f64 {
        match self.bounds.get(index) {
            Some(bound) => *bound,
            None => {
                let last = self.bounds.last().copied().unwrap_or(f64::NEG_INFINITY);
                self.max().map_or(f64::INFINITY, |max| max.max(last))
            }
        }
    }
}

impl Metric for Histogram {
    fn core(&self) -> &MetricCore {
        &self.core
    }

    fn reset(&self) {
        self.clear();
    }

    fn value(&self) -> MetricValue {
        MetricValue::Histogram(self.snapshot())
    }
}
