//! Capability traits and the composed [`Metrics`] facade
//!
//! Each trait covers one concern of [`MetricsCollector`] so callers can
//! depend on the narrowest capability they need.

use super::collector::{
    Collector, ExportFormat, ExportRenderer, HealthReport, MetricDescriptor, MetricSample,
    MetricsCollector, MetricsStats, RegisteredMetric,
};
use super::metrics::{Counter, Gauge, Histogram, MetricOptions, MetricType, Summary, Timer};
use crate::config::MetricsConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Lifecycle: Send + Sync {
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
    async fn health(&self) -> HealthReport;
}

pub trait Factory: Send + Sync {
    fn counter(&self, name: &str, options: MetricOptions) -> Result<Arc<Counter>>;
    fn gauge(&self, name: &str, options: MetricOptions) -> Result<Arc<Gauge>>;
    fn histogram(&self, name: &str, options: MetricOptions) -> Result<Arc<Histogram>>;
    fn summary(&self, name: &str, options: MetricOptions) -> Result<Arc<Summary>>;
    fn timer(&self, name: &str, options: MetricOptions) -> Result<Arc<Timer>>;
}

pub trait Exporter: Send + Sync {
    fn register_renderer(&self, format: ExportFormat, renderer: Arc<dyn ExportRenderer>);
    fn export(&self, format: ExportFormat) -> Result<String>;
    fn gather(&self) -> Vec<MetricSample>;
}

pub trait Registry: Send + Sync {
    fn register_collector(&self, collector: Arc<dyn Collector>) -> Result<()>;
    fn unregister_collector(&self, name: &str) -> bool;
}

pub trait Repository: Send + Sync {
    fn list_metrics(&self) -> Vec<MetricDescriptor>;
    fn list_metrics_by_type(&self, metric_type: MetricType) -> Vec<MetricDescriptor>;
    fn get(&self, name: &str) -> Option<RegisteredMetric>;
    fn stats(&self) -> MetricsStats;
}

pub trait Manager: Send + Sync {
    fn reset(&self);
    fn reset_metric(&self, name: &str) -> Result<()>;
    fn reload(&self, config: MetricsConfig) -> Result<()>;
}

#[async_trait]
impl Lifecycle for MetricsCollector {
    async fn start(&self) -> Result<()> {
        MetricsCollector::start(self).await
    }

    async fn stop(&self) -> Result<()> {
        MetricsCollector::stop(self).await
    }

    async fn health(&self) -> HealthReport {
        MetricsCollector::health(self).await
    }
}

impl Factory for MetricsCollector {
    fn counter(&self, name: &str, options: MetricOptions) -> Result<Arc<Counter>> {
        MetricsCollector::counter(self, name, options)
    }

    fn gauge(&self, name: &str, options: MetricOptions) -> Result<Arc<Gauge>> {
        MetricsCollector::gauge(self, name, options)
    }

    fn histogram(&self, name: &str, options: MetricOptions) -> Result<Arc<Histogram>> {
        MetricsCollector::histogram(self, name, options)
    }

    fn summary(&self, name: &str, options: MetricOptions) -> Result<Arc<Summary>> {
        MetricsCollector::summary(self, name, options)
    }

    fn timer(&self, name: &str, options: MetricOptions) -> Result<Arc<Timer>> {
        MetricsCollector::timer(self, name, options)
    }
}

impl Exporter for MetricsCollector {
    fn register_renderer(&self, format: ExportFormat, renderer: Arc<dyn ExportRenderer>) {
        MetricsCollector::register_renderer(self, format, renderer)
    }

    fn export(&self, format: ExportFormat) -> Result<String> {
        MetricsCollector::export(self, format)
    }

    fn gather(&self) -> Vec<MetricSample> {
        MetricsCollector::gather(self)
    }
}

impl Registry for MetricsCollector {
    fn register_collector(&self, collector: Arc<dyn Collector>) -> Result<()> {
        MetricsCollector::register_collector(self, collector)
    }

    fn unregister_collector(&self, name: &str) -> bool {
        MetricsCollector::unregister_collector(self, name)
    }
}

impl Repository for MetricsCollector {
    fn list_metrics(&self) -> Vec<MetricDescriptor> {
        MetricsCollector::list_metrics(self)
    }

    fn list_metrics_by_type(&self, metric_type: MetricType) -> Vec<MetricDescriptor> {
        MetricsCollector::list_metrics_by_type(self, metric_type)
    }

    fn get(&self, name: &str) -> Option<RegisteredMetric> {
        MetricsCollector::get(self, name)
    }

    fn stats(&self) -> MetricsStats {
        MetricsCollector::stats(self)
    }
}

impl Manager for MetricsCollector {
    fn reset(&self) {
        MetricsCollector::reset(self)
    }

    fn reset_metric(&self, name: &str) -> Result<()> {
        MetricsCollector::reset_metric(self, name)
    }

    fn reload(&self, config: MetricsConfig) -> Result<()> {
        MetricsCollector::reload(self, config)
    }
}

/// All capabilities behind one handle
#[derive(Clone)]
pub struct Metrics {
    pub lifecycle: Arc<dyn Lifecycle>,
    pub factory: Arc<dyn Factory>,
    pub exporter: Arc<dyn Exporter>,
    pub registry: Arc<dyn Registry>,
    pub repository: Arc<dyn Repository>,
    pub manager: Arc<dyn Manager>,
}

impl Metrics {
    /// Every capability backed by the same collector
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self {
            lifecycle: collector.clone(),
            factory: collector.clone(),
            exporter: collector.clone(),
            registry: collector.clone(),
            repository: collector.clone(),
            manager: collector,
        }
    }

    pub async fn start(&self) -> Result<()> {
        self.lifecycle.start().await
    }

    pub async fn stop(&self) -> Result<()> {
        self.lifecycle.stop().await
    }

    pub async fn health(&self) -> HealthReport {
        self.lifecycle.health().await
    }

    pub fn counter(&self, name: &str, options: MetricOptions) -> Result<Arc<Counter>> {
        self.factory.counter(name, options)
    }

    pub fn gauge(&self, name: &str, options: MetricOptions) -> Result<Arc<Gauge>> {
        self.factory.gauge(name, options)
    }

    pub fn histogram(&self, name: &str, options: MetricOptions) -> Result<Arc<Histogram>> {
        self.factory.histogram(name, options)
    }

    pub fn summary(&self, name: &str, options: MetricOptions) -> Result<Arc<Summary>> {
        self.factory.summary(name, options)
    }

    pub fn timer(&self, name: &str, options: MetricOptions) -> Result<Arc<Timer>> {
        self.factory.timer(name, options)
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}
