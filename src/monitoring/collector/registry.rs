//! Metric factory and custom collector registry

use super::collector::MetricsCollector;
use super::export::Collector;
use crate::config::MetricsConfig;
use crate::monitoring::metrics::{
    Counter, Gauge, Histogram, Metric, MetricCore, MetricOptions, MetricType, Summary, Timer,
    fully_qualified_name,
};
use crate::utils::error::{MetricsError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// A metric held by the collector
#[derive(Debug, Clone)]
pub enum RegisteredMetric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Histogram(Arc<Histogram>),
    Summary(Arc<Summary>),
    Timer(Arc<Timer>),
}

impl RegisteredMetric {
    pub fn as_metric(&self) -> &dyn Metric {
        match self {
            Self::Counter(m) => m.as_ref(),
            Self::Gauge(m) => m.as_ref(),
            Self::Histogram(m) => m.as_ref(),
            Self::Summary(m) => m.as_ref(),
            Self::Timer(m) => m.as_ref(),
        }
    }

    pub fn metric_type(&self) -> MetricType {
        match self {
            Self::Counter(_) => MetricType::Counter,
            Self::Gauge(_) => MetricType::Gauge,
            Self::Histogram(_) => MetricType::Histogram,
            Self::Summary(_) => MetricType::Summary,
            Self::Timer(_) => MetricType::Timer,
        }
    }
}

/// Stored metric plus the resolved options it was created with
#[derive(Debug)]
pub(super) struct Registration {
    pub metric: RegisteredMetric,
    pub options: MetricOptions,
}

/// Collector-wide settings first, caller options on top
fn resolve_options(config: &MetricsConfig, metric_type: MetricType, options: MetricOptions) -> MetricOptions {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    let mut labels = config.default_tags.clone();
    labels.extend(options.labels);

    let buckets = match metric_type {
        MetricType::Histogram => options.buckets.or_else(|| Some(config.default_buckets.clone())),
        _ => options.buckets,
    };
    let objectives = match metric_type {
        MetricType::Summary => options
            .objectives
            .or_else(|| Some(config.default_objectives.clone())),
        _ => options.objectives,
    };
    let buffer_cap = match metric_type {
        MetricType::Summary => options.buffer_cap.or(config.summary_buffer_cap),
        _ => options.buffer_cap,
    };
    let exemplar_capacity = match metric_type {
        MetricType::Counter | MetricType::Histogram | MetricType::Timer => options
            .exemplar_capacity
            .or(config.enable_exemplars.then_some(config.exemplar_capacity)),
        _ => None,
    };

    MetricOptions {
        namespace: options.namespace.or_else(|| non_empty(&config.namespace)),
        subsystem: options.subsystem.or_else(|| non_empty(&config.subsystem)),
        description: options.description,
        unit: options.unit,
        labels,
        const_labels: options.const_labels,
        buckets,
        objectives,
        buffer_cap,
        exemplar_capacity,
    }
}

fn build(name: &str, metric_type: MetricType, options: &MetricOptions) -> Result<RegisteredMetric> {
    let core = MetricCore::from_options(name, metric_type, options);
    let metric = match metric_type {
        MetricType::Counter => {
            RegisteredMetric::Counter(Arc::new(Counter::from_core(core, options.exemplar_capacity)))
        }
        MetricType::Gauge => RegisteredMetric::Gauge(Arc::new(Gauge::from_core(core))),
        MetricType::Histogram => RegisteredMetric::Histogram(Arc::new(Histogram::from_core(
            core,
            options.buckets.clone().unwrap_or_default(),
            options.exemplar_capacity,
        )?)),
        MetricType::Summary => RegisteredMetric::Summary(Arc::new(Summary::from_core(
            core,
            options.objectives.clone(),
            options.buffer_cap,
        ))),
        MetricType::Timer => {
            let buckets = options
                .buckets
                .clone()
                .unwrap_or_else(|| crate::monitoring::metrics::DEFAULT_TIMER_BUCKETS_MS.to_vec());
            RegisteredMetric::Timer(Arc::new(Timer::from_core(
                core,
                buckets,
                options.exemplar_capacity,
            )?))
        }
    };
    Ok(metric)
}

impl MetricsCollector {
    pub fn counter(&self, name: &str, options: MetricOptions) -> Result<Arc<Counter>> {
        match self.get_or_create(name, MetricType::Counter, options)? {
            RegisteredMetric::Counter(metric) => Ok(metric),
            other => Err(type_mismatch(name, other.metric_type(), MetricType::Counter)),
        }
    }

    pub fn gauge(&self, name: &str, options: MetricOptions) -> Result<Arc<Gauge>> {
        match self.get_or_create(name, MetricType::Gauge, options)? {
            RegisteredMetric::Gauge(metric) => Ok(metric),
            other => Err(type_mismatch(name, other.metric_type(), MetricType::Gauge)),
        }
    }

    pub fn histogram(&self, name: &str, options: MetricOptions) -> Result<Arc<Histogram>> {
        match self.get_or_create(name, MetricType::Histogram, options)? {
            RegisteredMetric::Histogram(metric) => Ok(metric),
            other => Err(type_mismatch(name, other.metric_type(), MetricType::Histogram)),
        }
    }

    pub fn summary(&self, name: &str, options: MetricOptions) -> Result<Arc<Summary>> {
        match self.get_or_create(name, MetricType::Summary, options)? {
            RegisteredMetric::Summary(metric) => Ok(metric),
            other => Err(type_mismatch(name, other.metric_type(), MetricType::Summary)),
        }
    }

    pub fn timer(&self, name: &str, options: MetricOptions) -> Result<Arc<Timer>> {
        match self.get_or_create(name, MetricType::Timer, options)? {
            RegisteredMetric::Timer(metric) => Ok(metric),
            other => Err(type_mismatch(name, other.metric_type(), MetricType::Timer)),
        }
    }

    /// Memoized creation by fully-qualified name.
    ///
    /// Labels are validated and the cardinality slot is claimed before the
    /// metric becomes visible; any failure leaves the registry untouched.
    fn get_or_create(
        &self,
        name: &str,
        metric_type: MetricType,
        options: MetricOptions,
    ) -> Result<RegisteredMetric> {
        let active = self.active_config.load_full();
        let config: &MetricsConfig = &active.config;
        let governor = &active.governor;

        let plain_lookup = options == MetricOptions::default();
        let mut resolved = resolve_options(config, metric_type, options);
        resolved.labels = governor.validate_and_sanitize_tags(&resolved.labels)?;
        resolved.const_labels = governor.validate_and_sanitize_tags(&resolved.const_labels)?;

        let fq_name = fully_qualified_name(
            resolved.namespace.as_deref().unwrap_or_default(),
            resolved.subsystem.as_deref().unwrap_or_default(),
            name,
        );

        if let Some(existing) = self.metrics.read().get(&fq_name) {
            return self.reuse(&fq_name, existing, metric_type, &resolved, plain_lookup, config);
        }

        let mut metrics = self.metrics.write();
        if let Some(existing) = metrics.get(&fq_name) {
            return self.reuse(&fq_name, existing, metric_type, &resolved, plain_lookup, config);
        }

        let metric = build(name, metric_type, &resolved)?;
        self.cardinality
            .record(&fq_name, &metric.as_metric().core().all_labels())?;

        debug!(metric = %fq_name, metric_type = %metric_type, "Created metric");
        metrics.insert(
            fq_name,
            Registration {
                metric: metric.clone(),
                options: resolved,
            },
        );
        Ok(metric)
    }

    fn reuse(
        &self,
        fq_name: &str,
        existing: &Registration,
        metric_type: MetricType,
        resolved: &MetricOptions,
        plain_lookup: bool,
        config: &MetricsConfig,
    ) -> Result<RegisteredMetric> {
        let existing_type = existing.metric.metric_type();
        if existing_type != metric_type {
            return Err(type_mismatch(fq_name, existing_type, metric_type));
        }
        if !plain_lookup && existing.options != *resolved {
            if config.strict_registration {
                return Err(MetricsError::ConflictingRegistration {
                    name: fq_name.to_string(),
                });
            }
            warn!(
                metric = %fq_name,
                "Metric re-registered with different options, returning the existing instance"
            );
        }
        Ok(existing.metric.clone())
    }

    /// Add a custom collector; names must be unique
    pub fn register_collector(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let name = collector.name().to_string();
        let mut collectors = self.collectors.write();
        if collectors.contains_key(&name) {
            return Err(MetricsError::ConflictingRegistration { name });
        }
        debug!(collector = %name, "Registered custom collector");
        collectors.insert(name, collector);
        Ok(())
    }

    /// Returns whether a collector with that name was registered
    pub fn unregister_collector(&self, name: &str) -> bool {
        self.collectors.write().remove(name).is_some()
    }
}

fn type_mismatch(name: &str, existing: MetricType, requested: MetricType) -> MetricsError {
    MetricsError::TypeMismatch {
        name: name.to_string(),
        existing,
        requested,
    }
}
