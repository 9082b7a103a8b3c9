//! Collector integration tests
//!
//! Factory, governance, facade and export behaviour through the public API.

#[cfg(test)]
mod tests {
    use crate::common::collector_with;
    use std::sync::Arc;
    use telemetry_kit::{
        Exemplar, ExportFormat, ExportRenderer, HealthStatus, MetricOptions, MetricSample,
        MetricType, MetricValue, Metrics, MetricsCollector, MetricsError, Result,
    };

    /// Minimal line renderer: `name value`
    struct LineRenderer;

    impl ExportRenderer for LineRenderer {
        fn render(&self, samples: &[MetricSample]) -> Result<String> {
            let lines: Vec<String> = samples
                .iter()
                .filter_map(|s| match &s.value {
                    MetricValue::Counter { value } | MetricValue::Gauge { value } => {
                        Some(format!("{} {}", s.descriptor.name, value))
                    }
                    _ => None,
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }

    #[test]
    fn test_end_to_end_export() {
        let collector = collector_with(|c| c.namespace = "shop".to_string());
        collector
            .counter("orders_total", MetricOptions::new())
            .unwrap()
            .add(3.0);
        collector
            .gauge("cart_items", MetricOptions::new())
            .unwrap()
            .set(7.0);
        collector
            .histogram("basket_value", MetricOptions::new())
            .unwrap()
            .observe(42.0);

        collector.register_renderer(ExportFormat::Prometheus, Arc::new(LineRenderer));
        let output = collector.export(ExportFormat::Prometheus).unwrap();
        assert_eq!(output, "shop_cart_items 7\nshop_orders_total 3");

        assert!(matches!(
            collector.export(ExportFormat::InfluxDb),
            Err(MetricsError::UnsupportedFormat(ExportFormat::InfluxDb))
        ));
    }

    #[test]
    fn test_gather_reports_histogram_snapshot() {
        let collector = Arc::new(MetricsCollector::default());
        let histogram = collector
            .histogram("latency", MetricOptions::new().with_buckets(vec![1.0, 2.0]))
            .unwrap();
        histogram.observe(0.5);
        histogram.observe(1.5);
        histogram.observe(9.0);

        let samples = collector.gather();
        let MetricValue::Histogram(snapshot) = &samples[0].value else {
            panic!("expected histogram, got {:?}", samples[0].value);
        };
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.buckets.len(), 3);
        assert_eq!(snapshot.min, Some(0.5));
        assert_eq!(snapshot.max, Some(9.0));
        assert!(samples[0].timestamp.is_some());
    }

    #[test]
    fn test_exemplars_through_collector() {
        let collector = collector_with(|c| {
            c.enable_exemplars = true;
            c.exemplar_capacity = 3;
        });
        let timer = collector.timer("checkout", MetricOptions::new()).unwrap();
        for i in 0..8 {
            timer.record_with_exemplar(
                std::time::Duration::from_millis(i),
                Exemplar::new(i as f64, format!("trace-{i}"), "span").with_label("user", "u1"),
            );
        }
        let exemplars = timer.exemplars();
        assert_eq!(exemplars.len(), 3);
        assert!(exemplars.iter().all(|e| e.labels.contains_key("user")));
    }

    #[test]
    fn test_governance_blocks_bad_labels_and_cardinality() {
        let collector = collector_with(|c| {
            c.auto_sanitize_labels = false;
            c.max_cardinality = 3;
        });

        assert!(matches!(
            collector.counter("a", MetricOptions::new().with_label("le", "1")),
            Err(MetricsError::Label(_))
        ));
        for name in ["a", "b", "c"] {
            collector.counter(name, MetricOptions::new()).unwrap();
        }
        assert!(matches!(
            collector.counter("d", MetricOptions::new()),
            Err(MetricsError::CardinalityLimitExceeded { limit: 3, .. })
        ));

        let stats = collector.stats();
        assert_eq!(stats.counters, 3);
        assert_eq!(stats.cardinality_current, 3);
        assert_eq!(stats.cardinality_overflows, 1);
    }

    #[tokio::test]
    async fn test_facade_round_trip() {
        let collector = Arc::new(MetricsCollector::default());
        let metrics = Metrics::new(collector.clone());
        metrics.start().await.unwrap();

        let summary = metrics.summary("score", MetricOptions::new()).unwrap();
        for v in 1..=100 {
            summary.observe(v as f64);
        }
        let timer = metrics.timer("job", MetricOptions::new()).unwrap();
        timer.time()();

        let summaries = metrics.repository.list_metrics_by_type(MetricType::Summary);
        assert_eq!(summaries.len(), 1);
        assert_eq!(timer.count(), 1);

        metrics.manager.reset_metric("score").unwrap();
        assert_eq!(summary.count(), 0);

        let health = metrics.health().await;
        assert_eq!(health.status, HealthStatus::Healthy);
        assert!(health.active);
        metrics.stop().await.unwrap();
    }
}
