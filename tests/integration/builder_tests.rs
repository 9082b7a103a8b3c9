//! Collector builder integration tests
//!
//! Real background tasks against real collectors.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedSource, collector_with, fast_builder_options, wait_until};
    use std::sync::Arc;
    use std::time::Duration;
    use telemetry_kit::{
        CollectorBuilder, MetricOptions, MetricsCollector, MetricsError, PushableCollectorBuilder,
        Snapshot,
    };

    fn counter(collector: &MetricsCollector, name: &str) -> f64 {
        collector.counter(name, MetricOptions::new()).unwrap().get()
    }

    #[tokio::test]
    async fn test_pull_builder_round_trip_in_background() {
        let collector = Arc::new(MetricsCollector::default());
        let source = ScriptedSource::counter_totals("bytes_total", &[10.0, 10.0, 25.0, 25.0, 60.0]);
        let builder =
            CollectorBuilder::new(collector.clone(), source.clone(), fast_builder_options()).unwrap();

        builder.start().await.unwrap();
        wait_until(|| source.calls() >= 5).await;
        builder.stop().await.unwrap();

        assert_eq!(counter(&collector, "bytes_total"), 60.0);
        assert_eq!(builder.counter_resets("bytes_total"), 0);
        assert_eq!(builder.stats().failures, 0);
    }

    #[tokio::test]
    async fn test_source_restart_is_detected() {
        let collector = Arc::new(MetricsCollector::default());
        let source = ScriptedSource::counter_totals("restarts_probe", &[100.0, 10.0]);
        let builder =
            CollectorBuilder::new(collector.clone(), source, fast_builder_options()).unwrap();

        builder.collect_once().await.unwrap();
        builder.collect_once().await.unwrap();

        assert_eq!(counter(&collector, "restarts_probe"), 110.0);
        assert_eq!(builder.counter_resets("restarts_probe"), 1);
    }

    #[tokio::test]
    async fn test_loop_survives_source_errors() {
        let collector = Arc::new(MetricsCollector::default());
        let source = ScriptedSource::new(
            "flaky",
            vec![
                Err(MetricsError::collection("flaky", "timeout")),
                Err(MetricsError::collection("flaky", "timeout")),
                Ok(Snapshot::new().with_gauge("recovered", 1.0)),
            ],
        );
        let builder = CollectorBuilder::new(
            collector.clone(),
            source.clone(),
            fast_builder_options().with_error_counter(),
        )
        .unwrap();

        builder.start().await.unwrap();
        wait_until(|| collector.get("recovered").is_some()).await;
        builder.stop().await.unwrap();

        let stats = builder.stats();
        assert_eq!(stats.failures, 2);
        assert!(stats.collections >= 1);
        assert_eq!(counter(&collector, "collection_errors_total"), 2.0);
    }

    #[tokio::test]
    async fn test_push_backpressure_and_drain() {
        let collector = Arc::new(MetricsCollector::default());
        let builder = PushableCollectorBuilder::new(
            collector.clone(),
            fast_builder_options().with_push_buffer_size(2),
        )
        .unwrap();

        let outcomes: Vec<_> = [1.0, 2.0, 3.0]
            .into_iter()
            .map(|total| builder.push(Snapshot::new().with_counter("pushed_total", total)))
            .collect();
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, Err(MetricsError::PushBufferFull)))
                .count(),
            1
        );

        builder.start().await.unwrap();
        wait_until(|| builder.pending() == 0 && builder.stats().collections == 2).await;
        builder.stop().await.unwrap();
        assert_eq!(counter(&collector, "pushed_total"), 2.0);
    }

    #[tokio::test]
    async fn test_stop_preserves_metric_state() {
        let collector = collector_with(|c| c.namespace = "agent".to_string());
        let source = ScriptedSource::new("one-shot", vec![Ok(Snapshot::new().with_gauge("up", 1.0))]);
        let builder =
            CollectorBuilder::new(collector.clone(), source, fast_builder_options()).unwrap();

        builder.start().await.unwrap();
        wait_until(|| collector.get("agent_up").is_some()).await;
        builder.stop().await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(collector.get("agent_up").is_some());
        assert_eq!(collector.stats().gauges, 1);
    }

    #[tokio::test]
    async fn test_concurrent_builders_share_collector() {
        let collector = Arc::new(MetricsCollector::default());
        let builders: Vec<_> = (0..4)
            .map(|i| {
                let source = ScriptedSource::new(
                    &format!("src{i}"),
                    vec![Ok(Snapshot::new().with_counter("shared_total", 5.0))],
                );
                CollectorBuilder::new(collector.clone(), source, fast_builder_options()).unwrap()
            })
            .collect();

        for builder in &builders {
            builder.start().await.unwrap();
        }
        wait_until(|| builders.iter().all(|b| b.stats().collections >= 1)).await;
        for builder in &builders {
            builder.stop().await.unwrap();
        }

        // each builder keeps its own baseline
        assert_eq!(counter(&collector, "shared_total"), 20.0);
    }
}
