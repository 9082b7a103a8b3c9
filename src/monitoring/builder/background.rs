//! The single background task owned by a started builder

use super::applier::SnapshotApplier;
use super::snapshot::Snapshot;
use super::source::MetricSource;
use crate::utils::error::{MetricsError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

type PushReceiver = mpsc::Receiver<Snapshot>;

/// Handle to a running collection loop
pub(super) struct BackgroundTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Option<PushReceiver>>,
}

impl BackgroundTask {
    /// Spawn the loop: one pull immediately, then one per tick, plus pushes as they arrive
    pub fn spawn(
        applier: Arc<SnapshotApplier>,
        source: Option<Arc<dyn MetricSource>>,
        pushes: Option<PushReceiver>,
        interval: Duration,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_collection_loop(
            applier,
            source,
            pushes,
            interval,
            shutdown_rx,
        ));
        Self { shutdown, handle }
    }

    /// Signal shutdown and wait for the loop to exit, handing back the push receiver
    pub async fn shutdown(self) -> Result<Option<PushReceiver>> {
        let _ = self.shutdown.send(true);
        self.handle
            .await
            .map_err(|e| MetricsError::runtime(format!("Collection task failed: {}", e)))
    }
}

async fn run_collection_loop(
    applier: Arc<SnapshotApplier>,
    source: Option<Arc<dyn MetricSource>>,
    mut pushes: Option<PushReceiver>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Option<PushReceiver> {
    info!(
        builder = %applier.name(),
        interval_ms = interval.as_millis() as u64,
        pull = source.is_some(),
        push = pushes.is_some(),
        "Starting collection task"
    );

    let mut ticker = match &source {
        Some(_) if interval.is_zero() => {
            warn!(builder = %applier.name(), "Zero collection interval, pulls disabled");
            None
        }
        Some(_) => {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        }
        None => None,
    };

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = next_tick(&mut ticker) => {
                let Some(source) = &source else { continue };
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => {
                        debug!(builder = %applier.name(), "Dropping in-flight collection on shutdown");
                        break;
                    }
                    _ = applier.run_cycle(source.as_ref()) => {}
                }
            }
            Some(snapshot) = next_push(&mut pushes) => {
                let _ = applier.apply_pushed(snapshot).await;
            }
        }
    }

    info!(builder = %applier.name(), "Collection task stopped");
    pushes
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_push(pushes: &mut Option<PushReceiver>) -> Option<Snapshot> {
    match pushes {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}
