//! Snapshot application shared by pull and push builders

use super::options::{BuilderOptions, COLLECTION_ERRORS_METRIC, ErrorHandler};
use super::snapshot::Snapshot;
use super::source::MetricSource;
use crate::monitoring::collector::MetricsCollector;
use crate::monitoring::metrics::{Counter, Gauge, Histogram, MetricOptions, Summary, Timer};
use crate::utils::error::{MetricsError, Result};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Counters kept per builder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuilderStats {
    /// Successfully applied snapshots
    pub collections: u64,
    pub failures: u64,
    /// Detected counter resets across all names
    pub resets: u64,
    pub last_error: Option<String>,
    pub last_collection: Option<DateTime<Utc>>,
}

/// Handles resolved for one snapshot, before anything is mutated
struct Resolved {
    counters: Vec<(String, Arc<Counter>, f64)>,
    gauges: Vec<(Arc<Gauge>, f64)>,
    histograms: Vec<(Arc<Histogram>, Vec<f64>)>,
    summaries: Vec<(Arc<Summary>, Vec<f64>)>,
    timers: Vec<(Arc<Timer>, Vec<Duration>)>,
}

pub(super) struct SnapshotApplier {
    name: String,
    collector: Arc<MetricsCollector>,
    /// Last raw total per counter name
    baselines: Mutex<HashMap<String, f64>>,
    resets: Mutex<HashMap<String, u64>>,
    stats: RwLock<BuilderStats>,
    error_handler: Option<ErrorHandler>,
    error_counter: Option<Arc<Counter>>,
    /// Held across collect and apply so cycles never overlap
    cycle: tokio::sync::Mutex<()>,
}

impl SnapshotApplier {
    pub fn new(name: String, collector: Arc<MetricsCollector>, options: &BuilderOptions) -> Result<Self> {
        let error_counter = if options.count_errors {
            Some(collector.counter(
                COLLECTION_ERRORS_METRIC,
                MetricOptions::new().with_description("Failed collection cycles across builders"),
            )?)
        } else {
            None
        };

        Ok(Self {
            name,
            collector,
            baselines: Mutex::new(HashMap::new()),
            resets: Mutex::new(HashMap::new()),
            stats: RwLock::new(BuilderStats::default()),
            error_handler: options.error_handler.clone(),
            error_counter,
            cycle: tokio::sync::Mutex::new(()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> BuilderStats {
        self.stats.read().clone()
    }

    pub fn counter_resets(&self, name: &str) -> u64 {
        self.resets.lock().get(name).copied().unwrap_or(0)
    }

    pub fn all_counter_resets(&self) -> HashMap<String, u64> {
        self.resets.lock().clone()
    }

    /// Collect from `source` and apply the result as one serialized cycle
    pub async fn run_cycle(&self, source: &dyn MetricSource) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        let outcome = source.collect().await;
        self.complete(outcome)
    }

    /// Apply a pushed snapshot as one serialized cycle
    pub async fn apply_pushed(&self, snapshot: Snapshot) -> Result<()> {
        let _cycle = self.cycle.lock().await;
        self.complete(Ok(snapshot))
    }

    /// Apply the outcome of one cycle, recording failures; the error is handed back to the caller
    fn complete(&self, outcome: Result<Snapshot>) -> Result<()> {
        let result = outcome.and_then(|snapshot| self.apply(snapshot));
        if let Err(err) = &result {
            self.record_failure(err);
        }
        result
    }

    /// Validate, resolve every handle, then mutate.
    fn apply(&self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        let resolved = self.resolve(snapshot)?;

        let mut reset_count = 0;
        {
            let mut baselines = self.baselines.lock();
            let mut resets = self.resets.lock();
            for (name, counter, total) in resolved.counters {
                let delta = match baselines.insert(name.clone(), total) {
                    Some(previous) if total >= previous => total - previous,
                    Some(previous) => {
                        debug!(
                            builder = %self.name,
                            counter = %name,
                            previous,
                            total,
                            "Counter went backwards, treating as reset"
                        );
                        *resets.entry(name).or_insert(0) += 1;
                        reset_count += 1;
                        total
                    }
                    None => total,
                };
                counter.add(delta);
            }
        }

        for (gauge, value) in resolved.gauges {
            gauge.set(value);
        }
        for (histogram, values) in resolved.histograms {
            values.into_iter().for_each(|v| histogram.observe(v));
        }
        for (summary, values) in resolved.summaries {
            values.into_iter().for_each(|v| summary.observe(v));
        }
        for (timer, durations) in resolved.timers {
            durations.into_iter().for_each(|d| timer.record(d));
        }

        let mut stats = self.stats.write();
        stats.collections += 1;
        stats.resets += reset_count;
        stats.last_collection = Some(Utc::now());
        Ok(())
    }

    fn resolve(&self, snapshot: Snapshot) -> Result<Resolved> {
        let collector = &self.collector;
        let labels = snapshot.labels;
        let options = || {
            if labels.is_empty() {
                MetricOptions::new()
            } else {
                MetricOptions::new().with_labels(labels.clone())
            }
        };

        let counters = snapshot
            .counters
            .into_iter()
            .map(|(name, total)| -> Result<_> {
                let counter = collector.counter(&name, options())?;
                Ok((name, counter, total))
            })
            .collect::<Result<_>>()?;
        let gauges = snapshot
            .gauges
            .into_iter()
            .map(|(name, value)| -> Result<_> { Ok((collector.gauge(&name, options())?, value)) })
            .collect::<Result<_>>()?;
        let histograms = snapshot
            .histograms
            .into_iter()
            .map(|(name, values)| -> Result<_> { Ok((collector.histogram(&name, options())?, values)) })
            .collect::<Result<_>>()?;
        let summaries = snapshot
            .summaries
            .into_iter()
            .map(|(name, values)| -> Result<_> { Ok((collector.summary(&name, options())?, values)) })
            .collect::<Result<_>>()?;
        let timers = snapshot
            .timers
            .into_iter()
            .map(|(name, durations)| -> Result<_> { Ok((collector.timer(&name, options())?, durations)) })
            .collect::<Result<_>>()?;

        Ok(Resolved {
            counters,
            gauges,
            histograms,
            summaries,
            timers,
        })
    }

    fn record_failure(&self, err: &MetricsError) {
        warn!(builder = %self.name, error = %err, "Collection cycle failed");
        {
            let mut stats = self.stats.write();
            stats.failures += 1;
            stats.last_error = Some(err.to_string());
        }
        if let Some(counter) = &self.error_counter {
            counter.inc();
        }
        if let Some(handler) = &self.error_handler {
            handler(err);
        }
    }
}
