//! Metrics collector: owns every metric created through it

use super::export::{Collector, ExportFormat, ExportRenderer};
use super::registry::Registration;
use super::types::{HealthReport, HealthStatus};
use crate::config::MetricsConfig;
use crate::monitoring::governance::{CardinalityTracker, LabelGovernor, LabelPolicy};
use crate::utils::error::Result;
use arc_swap::ArcSwap;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Cardinality usage at which health degrades
const CARDINALITY_WARN_RATIO: f64 = 0.9;

static DEFAULT_COLLECTOR: Lazy<Arc<MetricsCollector>> =
    Lazy::new(|| Arc::new(MetricsCollector::default()));

/// Process-wide collector built from the default configuration
pub fn default_collector() -> Arc<MetricsCollector> {
    Arc::clone(&DEFAULT_COLLECTOR)
}

/// Configuration and the label governor derived from it, swapped together
pub(super) struct ActiveConfig {
    pub(super) config: Arc<MetricsConfig>,
    pub(super) governor: Arc<LabelGovernor>,
}

impl ActiveConfig {
    pub(super) fn new(config: MetricsConfig) -> Self {
        Self {
            governor: Arc::new(LabelGovernor::new(LabelPolicy::from(&config))),
            config: Arc::new(config),
        }
    }
}

/// Factory, registry and repository for metrics
pub struct MetricsCollector {
    /// Active configuration, swapped on reload
    pub(super) active_config: ArcSwap<ActiveConfig>,
    pub(super) cardinality: CardinalityTracker,
    /// Metrics keyed by fully-qualified name
    pub(super) metrics: RwLock<HashMap<String, Registration>>,
    pub(super) collectors: RwLock<BTreeMap<String, Arc<dyn Collector>>>,
    pub(super) renderers: RwLock<HashMap<ExportFormat, Arc<dyn ExportRenderer>>>,
    /// Collection start time
    pub(super) start_time: Instant,
    /// Whether collection is active - using AtomicBool for lock-free access
    pub(super) active: AtomicBool,
}

impl MetricsCollector {
    /// Create a collector from a validated configuration
    pub fn new(config: MetricsConfig) -> Result<Self> {
        Ok(Self::build(config.validated()?))
    }

    fn build(config: MetricsConfig) -> Self {
        Self {
            cardinality: CardinalityTracker::new(config.max_cardinality),
            active_config: ArcSwap::from_pointee(ActiveConfig::new(config)),
            metrics: RwLock::new(HashMap::new()),
            collectors: RwLock::new(BTreeMap::new()),
            renderers: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
            active: AtomicBool::new(false),
        }
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> Arc<MetricsConfig> {
        Arc::clone(&self.active_config.load().config)
    }

    pub fn governor(&self) -> Arc<LabelGovernor> {
        Arc::clone(&self.active_config.load().governor)
    }

    pub fn cardinality(&self) -> &CardinalityTracker {
        &self.cardinality
    }

    /// Start metrics collection; a disabled configuration leaves the collector inactive
    pub async fn start(&self) -> Result<()> {
        if !self.active_config.load().config.enabled {
            info!("Metrics are disabled, collector not started");
            return Ok(());
        }
        debug!("Starting metrics collection");
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    /// Stop metrics collection; registered metrics keep their values
    pub async fn stop(&self) -> Result<()> {
        debug!("Stopping metrics collection");
        self.active.store(false, Ordering::Release);
        Ok(())
    }

    /// Check if metrics collection is active
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub async fn health(&self) -> HealthReport {
        let active = self.is_active();
        let limit = self.cardinality.limit();
        let current = self.cardinality.current();
        let usage = if limit == 0 {
            1.0
        } else {
            current as f64 / limit as f64
        };

        let (status, message) = if usage >= 1.0 && self.cardinality.overflow_count() > 0 {
            (
                HealthStatus::Unhealthy,
                Some(format!("Cardinality limit of {} reached, new series are rejected", limit)),
            )
        } else if usage >= CARDINALITY_WARN_RATIO {
            (
                HealthStatus::Degraded,
                Some(format!("Cardinality at {}/{}", current, limit)),
            )
        } else if !active {
            (HealthStatus::Degraded, Some("Collector is not started".to_string()))
        } else {
            (HealthStatus::Healthy, None)
        };

        HealthReport {
            status,
            active,
            cardinality_usage: usage,
            message,
            checked_at: Utc::now(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::build(MetricsConfig::default())
    }
}

impl fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("metrics", &self.metrics.read().len())
            .field("collectors", &self.collectors.read().len())
            .field("cardinality", &self.cardinality.current())
            .field("active", &self.is_active())
            .finish()
    }
}
