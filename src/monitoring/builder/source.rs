//! Pull-side telemetry sources

use super::snapshot::Snapshot;
use crate::utils::error::Result;
use async_trait::async_trait;

/// External system polled by a [`CollectorBuilder`](super::CollectorBuilder)
#[async_trait]
pub trait MetricSource: Send + Sync {
    fn name(&self) -> &str;

    async fn collect(&self) -> Result<Snapshot>;
}
