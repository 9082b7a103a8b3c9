//! Bounded tracking of unique (metric, label set) series

use crate::monitoring::metrics::Labels;
use crate::utils::error::{MetricsError, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::warn;

/// Caps the number of distinct series.
///
/// Once full, unseen combinations are rejected while every previously
/// recorded combination stays valid; nothing is ever evicted.
#[derive(Debug)]
pub struct CardinalityTracker {
    seen: RwLock<SeriesSet>,
    limit: AtomicUsize,
    overflow_count: AtomicU64,
}

impl CardinalityTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            seen: RwLock::new(SeriesSet::default()),
            limit: AtomicUsize::new(limit),
            overflow_count: AtomicU64::new(0),
        }
    }

    /// Whether recording this combination would succeed right now
    pub fn check(&self, metric: &str, labels: &Labels) -> bool {
        let seen = self.seen.read();
        seen.contains(metric, labels) || seen.len < self.limit()
    }

    /// Commit the combination, or fail if it is new and the tracker is full
    pub fn record(&self, metric: &str, labels: &Labels) -> Result<()> {
        if self.seen.read().contains(metric, labels) {
            return Ok(());
        }

        let mut seen = self.seen.write();
        if seen.contains(metric, labels) {
            return Ok(());
        }
        let limit = self.limit();
        if seen.len >= limit {
            self.overflow_count.fetch_add(1, Ordering::Relaxed);
            warn!(metric = %metric, limit, "Cardinality limit reached, rejecting new series");
            return Err(MetricsError::CardinalityLimitExceeded {
                metric: metric.to_string(),
                limit,
            });
        }
        seen.insert(metric, labels);
        Ok(())
    }

    pub fn contains(&self, metric: &str, labels: &Labels) -> bool {
        self.seen.read().contains(metric, labels)
    }

    /// Number of recorded series
    pub fn current(&self) -> usize {
        self.seen.read().len
    }

    pub fn limit(&self) -> usize {
        self.limit.load(Ordering::Acquire)
    }

    /// Lowering the limit below `current()` keeps existing series and only blocks new ones
    pub fn set_limit(&self, limit: usize) {
        self.limit.store(limit, Ordering::Release);
    }

    /// Rejected attempts since creation
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count.load(Ordering::Relaxed)
    }
}

/// Label sets grouped by metric name, compared structurally
#[derive(Debug, Default)]
struct SeriesSet {
    by_metric: HashMap<String, HashSet<Labels>>,
    len: usize,
}

impl SeriesSet {
    fn contains(&self, metric: &str, labels: &Labels) -> bool {
        self.by_metric
            .get(metric)
            .is_some_and(|series| series.contains(labels))
    }

    fn insert(&mut self, metric: &str, labels: &Labels) {
        let inserted = self
            .by_metric
            .entry(metric.to_string())
            .or_default()
            .insert(labels.clone());
        if inserted {
            self.len += 1;
        }
    }
}
