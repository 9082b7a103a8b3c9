//! Pull-mode builder: polls a [`MetricSource`] on an interval

use super::applier::{BuilderStats, SnapshotApplier};
use super::background::BackgroundTask;
use super::options::BuilderOptions;
use super::source::MetricSource;
use crate::monitoring::collector::MetricsCollector;
use crate::utils::error::{MetricsError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Bridges a pull-based source into a collector.
///
/// Counter totals reported by the source are converted to deltas. A total
/// lower than the previous one is treated as a source restart: the new
/// total is added as-is and the reset is counted. This is a heuristic and
/// undercounts if a source restarts and overtakes its previous total
/// between two polls.
pub struct CollectorBuilder {
    applier: Arc<SnapshotApplier>,
    source: Arc<dyn MetricSource>,
    interval: Duration,
    running: AtomicBool,
    task: Mutex<Option<BackgroundTask>>,
}

impl CollectorBuilder {
    pub fn new(
        collector: Arc<MetricsCollector>,
        source: Arc<dyn MetricSource>,
        options: BuilderOptions,
    ) -> Result<Self> {
        options.validate_interval()?;
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| source.name().to_string());
        Ok(Self {
            applier: Arc::new(SnapshotApplier::new(name, collector, &options)?),
            source,
            interval: options.interval,
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        self.applier.name()
    }

    /// Spawn the collection task; fails with `AlreadyStarted` when running
    pub async fn start(&self) -> Result<()> {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Err(MetricsError::AlreadyStarted(self.name().to_string()));
        }
        *task = Some(BackgroundTask::spawn(
            self.applier.clone(),
            Some(self.source.clone()),
            None,
            self.interval,
        ));
        self.running.store(true, Ordering::Release);
        info!(builder = %self.name(), "Collector builder started");
        Ok(())
    }

    /// Signal the task and wait for it; fails with `NotStarted` when stopped
    pub async fn stop(&self) -> Result<()> {
        let mut task = self.task.lock().await;
        let running = task
            .take()
            .ok_or_else(|| MetricsError::NotStarted(self.name().to_string()))?;
        self.running.store(false, Ordering::Release);
        running.shutdown().await?;
        info!(builder = %self.name(), "Collector builder stopped");
        Ok(())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one collection cycle on the caller's task, after any cycle in flight
    pub async fn collect_once(&self) -> Result<()> {
        self.applier.run_cycle(self.source.as_ref()).await
    }

    /// Resets detected for one counter name
    pub fn counter_resets(&self, name: &str) -> u64 {
        self.applier.counter_resets(name)
    }

    pub fn all_counter_resets(&self) -> HashMap<String, u64> {
        self.applier.all_counter_resets()
    }

    pub fn stats(&self) -> BuilderStats {
        self.applier.stats()
    }
}
