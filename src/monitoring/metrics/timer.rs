//! Duration timer backed by a millisecond histogram

use super::core::{BucketCount, Labels, Metric, MetricCore, MetricType, MetricValue};
use super::exemplar::Exemplar;
use super::histogram::Histogram;
use super::options::MetricOptions;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Default timer bucket bounds in milliseconds
pub const DEFAULT_TIMER_BUCKETS_MS: [f64; 14] = [
    0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0,
    10_000.0,
];

#[derive(Debug)]
pub struct Timer {
    histogram: Histogram,
}

impl Timer {
    /// Bucket bounds in `options` are interpreted as milliseconds
    pub fn new(name: &str, options: MetricOptions) -> Result<Self> {
        let buckets = options
            .buckets
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMER_BUCKETS_MS.to_vec());
        let core = MetricCore::from_options(name, MetricType::Timer, &options);
        Self::from_core(core, buckets, options.exemplar_capacity)
    }

    pub(crate) fn from_core(
        core: MetricCore,
        buckets_ms: Vec<f64>,
        exemplar_capacity: Option<usize>,
    ) -> Result<Self> {
        Ok(Self {
            histogram: Histogram::from_core(core, buckets_ms, exemplar_capacity)?,
        })
    }

    pub fn record(&self, duration: Duration) {
        self.histogram.observe(duration_to_ms(duration));
    }

    pub fn record_with_exemplar(&self, duration: Duration, exemplar: Exemplar) {
        self.histogram
            .observe_with_exemplar(duration_to_ms(duration), exemplar);
    }

    /// Returns a closure that records the time elapsed since this call
    pub fn time(&self) -> impl FnOnce() + '_ {
        let start = Instant::now();
        move || self.record(start.elapsed())
    }

    /// Records the elapsed time when the guard is dropped or stopped
    pub fn start_timer(&self) -> TimerGuard<'_> {
        TimerGuard {
            timer: self,
            start: Instant::now(),
            recorded: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    pub fn sum(&self) -> Duration {
        ms_to_duration(self.histogram.sum())
    }

    pub fn mean(&self) -> Duration {
        ms_to_duration(self.histogram.mean())
    }

    pub fn min(&self) -> Option<Duration> {
        self.histogram.min().map(ms_to_duration)
    }

    pub fn max(&self) -> Option<Duration> {
        self.histogram.max().map(ms_to_duration)
    }

    pub fn quantile(&self, q: f64) -> Duration {
        ms_to_duration(self.histogram.quantile(q))
    }

    /// `p` in `[0, 100]`
    pub fn percentile(&self, p: f64) -> Duration {
        ms_to_duration(self.histogram.percentile(p))
    }

    /// Bucket counts with millisecond upper bounds
    pub fn buckets(&self) -> Vec<BucketCount> {
        self.histogram.buckets()
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.histogram.timestamp()
    }

    pub fn exemplars(&self) -> Vec<Exemplar> {
        self.histogram.exemplars()
    }

    pub fn with_labels(&self, labels: Labels) -> Timer {
        Timer {
            histogram: self.histogram.with_labels(labels),
        }
    }
}

impl Metric for Timer {
    fn core(&self) -> &MetricCore {
        self.histogram.core()
    }

    fn reset(&self) {
        self.histogram.clear();
    }

    fn value(&self) -> MetricValue {
        MetricValue::Timer(self.histogram.snapshot())
    }
}

/// Scoped timing; see [`Timer::start_timer`]
#[derive(Debug)]
pub struct TimerGuard<'a> {
    timer: &'a Timer,
    start: Instant,
    recorded: bool,
}

impl TimerGuard<'_> {
    /// Record now and return the measured duration
    pub fn stop(mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.timer.record(elapsed);
        self.recorded = true;
        elapsed
    }

    /// Drop without recording
    pub fn discard(mut self) {
        self.recorded = true;
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        if !self.recorded {
            self.timer.record(self.start.elapsed());
        }
    }
}

fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

fn ms_to_duration(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1_000.0).unwrap_or(Duration::MAX)
}
