//! Reset and reload operations

use super::collector::{ActiveConfig, MetricsCollector};
use crate::config::MetricsConfig;
use crate::utils::error::{MetricsError, Result};
use std::sync::Arc;
use tracing::info;

impl MetricsCollector {
    /// Zero every registered metric; registrations are kept
    pub fn reset(&self) {
        let metrics = self.metrics.read();
        for registration in metrics.values() {
            registration.metric.as_metric().reset();
        }
        info!(count = metrics.len(), "Reset all metrics");
    }

    pub fn reset_metric(&self, name: &str) -> Result<()> {
        let metrics = self.metrics.read();
        let registration = metrics
            .get(name)
            .ok_or_else(|| MetricsError::MetricNotFound(name.to_string()))?;
        registration.metric.as_metric().reset();
        Ok(())
    }

    /// Validate and swap in a new configuration.
    ///
    /// Label policy and cardinality limit apply immediately; namespace,
    /// default tags and metric defaults only affect metrics created afterwards.
    pub fn reload(&self, config: MetricsConfig) -> Result<()> {
        let config = config.validated()?;
        let max_cardinality = config.max_cardinality;
        info!(
            namespace = %config.namespace,
            max_cardinality,
            "Reloaded metrics configuration"
        );
        self.active_config.store(Arc::new(ActiveConfig::new(config)));
        self.cardinality.set_limit(max_cardinality);
        Ok(())
    }
}
