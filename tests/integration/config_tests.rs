//! Configuration integration tests

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;
    use telemetry_kit::{MetricOptions, MetricsCollector, MetricsConfig, MetricsError, Validate};

    #[tokio::test]
    async fn test_collector_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "namespace: billing\ndefault_tags:\n  team: payments\nmax_labels: 2\nauto_sanitize_labels: false"
        )
        .unwrap();

        let config = MetricsConfig::from_file(file.path()).await.unwrap();
        let collector = MetricsCollector::new(config).unwrap();

        let counter = collector
            .counter("invoices_total", MetricOptions::new().with_label("plan", "pro"))
            .unwrap();
        let descriptor = collector.describe("billing_invoices_total").unwrap();
        assert_eq!(descriptor.labels.len(), 2);
        counter.inc();

        let err = collector
            .counter(
                "refunds_total",
                MetricOptions::new().with_label("a", "1").with_label("b", "2"),
            )
            .unwrap_err();
        assert!(matches!(err, MetricsError::Label(_)));
    }

    #[tokio::test]
    async fn test_reload_from_file() {
        let collector = MetricsCollector::default();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_cardinality: 5\nstrict_registration: true").unwrap();

        let config = MetricsConfig::from_file(file.path()).await.unwrap();
        collector.reload(config).unwrap();

        assert_eq!(collector.cardinality().limit(), 5);
        assert!(collector.config().strict_registration);
    }

    #[test]
    fn test_env_overlay_then_merge() {
        let from_env = MetricsConfig::from_vars(vec![
            ("TELEMETRY_NAMESPACE".to_string(), "edge".to_string()),
            ("TELEMETRY_PUSH_BUFFER_SIZE".to_string(), "16".to_string()),
        ])
        .unwrap();
        assert!(from_env.validate().is_ok());

        let mut file_config = MetricsConfig::default();
        file_config.namespace = "file".to_string();
        file_config.max_labels = 4;

        let merged = file_config.merge(from_env);
        assert_eq!(merged.namespace, "edge");
        assert_eq!(merged.push_buffer_size, 16);
        assert_eq!(merged.max_labels, 4);
    }
}
