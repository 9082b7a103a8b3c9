//! Test fixtures and scripted sources

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use telemetry_kit::{BuilderOptions, MetricSource, MetricsCollector, MetricsConfig, Result, Snapshot};

/// Collector built from the default config after `edit`
pub fn collector_with(edit: impl FnOnce(&mut MetricsConfig)) -> Arc<MetricsCollector> {
    let mut config = MetricsConfig::default();
    edit(&mut config);
    Arc::new(MetricsCollector::new(config).unwrap())
}

pub fn fast_builder_options() -> BuilderOptions {
    BuilderOptions::default().with_interval(Duration::from_millis(10))
}

/// Poll `condition` for up to two seconds
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}

/// Replays queued outcomes in order, then returns empty snapshots
pub struct ScriptedSource {
    name: String,
    outcomes: Mutex<VecDeque<Result<Snapshot>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(name: &str, outcomes: Vec<Result<Snapshot>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// One snapshot per total, each reporting `counter`
    pub fn counter_totals(counter: &str, totals: &[f64]) -> Arc<Self> {
        Self::new(
            "counter-script",
            totals
                .iter()
                .map(|total| Ok(Snapshot::new().with_counter(counter, *total)))
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Snapshot::new()))
    }
}
