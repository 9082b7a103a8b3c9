//! Hybrid builder: accepts pushed snapshots, optionally also polls a source

use super::applier::{BuilderStats, SnapshotApplier};
use super::background::BackgroundTask;
use super::options::BuilderOptions;
use super::snapshot::Snapshot;
use super::source::MetricSource;
use crate::monitoring::collector::MetricsCollector;
use crate::utils::error::{MetricsError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{info, warn};

/// Accepts snapshots over a bounded channel.
///
/// Pushes made while stopped stay queued and are applied after the next
/// `start()`. A full queue rejects the push immediately.
pub struct PushableCollectorBuilder {
    applier: Arc<SnapshotApplier>,
    source: Option<Arc<dyn MetricSource>>,
    interval: Duration,
    sender: mpsc::Sender<Snapshot>,
    /// Parked here while no task owns it
    receiver: parking_lot::Mutex<Option<mpsc::Receiver<Snapshot>>>,
    running: AtomicBool,
    task: tokio::sync::Mutex<Option<BackgroundTask>>,
}

impl PushableCollectorBuilder {
    pub fn new(collector: Arc<MetricsCollector>, options: BuilderOptions) -> Result<Self> {
        let name = options.name.clone().unwrap_or_else(|| "push".to_string());
        Self::build(name, collector, None, options)
    }

    /// Also poll `source` on every tick
    pub fn with_source(
        collector: Arc<MetricsCollector>,
        source: Arc<dyn MetricSource>,
        options: BuilderOptions,
    ) -> Result<Self> {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| source.name().to_string());
        Self::build(name, collector, Some(source), options)
    }

    fn build(
        name: String,
        collector: Arc<MetricsCollector>,
        source: Option<Arc<dyn MetricSource>>,
        options: BuilderOptions,
    ) -> Result<Self> {
        if source.is_some() {
            options.validate_interval()?;
        }
        if options.push_buffer_size == 0 {
            return Err(MetricsError::config("push_buffer_size must be greater than 0"));
        }
        let (sender, receiver) = mpsc::channel(options.push_buffer_size);
        Ok(Self {
            applier: Arc::new(SnapshotApplier::new(name, collector, &options)?),
            source,
            interval: options.interval,
            sender,
            receiver: parking_lot::Mutex::new(Some(receiver)),
            running: AtomicBool::new(false),
            task: tokio::sync::Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        self.applier.name()
    }

    /// Validate and enqueue without waiting
    pub fn push(&self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        self.sender.try_send(snapshot).map_err(|e| match e {
            TrySendError::Full(_) => {
                warn!(builder = %self.name(), "Push buffer full, dropping snapshot");
                MetricsError::PushBufferFull
            }
            TrySendError::Closed(_) => MetricsError::runtime("Push channel is closed"),
        })
    }

    /// Snapshots waiting to be applied
    pub fn pending(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub async fn start(&self) -> Result<()> {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Err(MetricsError::AlreadyStarted(self.name().to_string()));
        }
        let receiver = self.receiver.lock().take();
        if receiver.is_none() {
            warn!(builder = %self.name(), "Push receiver lost, only pulling");
        }
        *task = Some(BackgroundTask::spawn(
            self.applier.clone(),
            self.source.clone(),
            receiver,
            self.interval,
        ));
        self.running.store(true, Ordering::Release);
        info!(builder = %self.name(), "Pushable collector builder started");
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        let mut task = self.task.lock().await;
        let running = task
            .take()
            .ok_or_else(|| MetricsError::NotStarted(self.name().to_string()))?;
        self.running.store(false, Ordering::Release);
        let receiver = running.shutdown().await?;
        *self.receiver.lock() = receiver;
        info!(builder = %self.name(), "Pushable collector builder stopped");
        Ok(())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Poll the source once, if one is configured
    pub async fn collect_once(&self) -> Result<()> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| MetricsError::config("No metric source configured"))?;
        self.applier.run_cycle(source.as_ref()).await
    }

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
