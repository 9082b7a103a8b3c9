//! Property-style tests over the metric primitives
//!
//! Inputs come from a deterministic xorshift generator so runs are repeatable.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::assert_non_decreasing;
    use std::sync::Arc;
    use std::thread;
    use telemetry_kit::{
        CardinalityTracker, Counter, ExemplarStore, Exemplar, Histogram, Labels, MetricOptions,
        Summary,
    };

    struct XorShift(u64);

    impl XorShift {
        fn next_f64(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    #[test]
    fn test_counter_is_monotonic_under_any_deltas() {
        let counter = Counter::new("mono", MetricOptions::new());
        let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
        let mut seen = vec![counter.get()];
        for _ in 0..1000 {
            counter.add(rng.next_f64() * 20.0 - 10.0);
            seen.push(counter.get());
        }
        assert_non_decreasing(&seen);
    }

    #[test]
    fn test_histogram_count_equals_bucket_sum() {
        let histogram = Arc::new(
            Histogram::new(
                "h",
                MetricOptions::new().with_buckets(vec![0.1, 0.25, 0.5, 0.75, 0.9]),
            )
            .unwrap(),
        );

        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let histogram = histogram.clone();
                thread::spawn(move || {
                    let mut rng = XorShift(seed * 7919 + 1);
                    for _ in 0..2500 {
                        histogram.observe(rng.next_f64() * 1.2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let bucket_total: u64 = histogram.buckets().iter().map(|b| b.count).sum();
        assert_eq!(histogram.count(), 10_000);
        assert_eq!(bucket_total, histogram.count());
    }

    #[test]
    fn test_quantiles_are_ordered() {
        let histogram = Histogram::new("h", MetricOptions::new()).unwrap();
        let summary = Summary::new("s", MetricOptions::new());
        let mut rng = XorShift(42);
        for _ in 0..5000 {
            let v = rng.next_f64() * 10.0;
            histogram.observe(v);
            summary.observe(v);
        }

        let qs = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99, 1.0];
        let from_histogram: Vec<f64> = qs.iter().map(|q| histogram.quantile(*q)).collect();
        let from_summary: Vec<f64> = qs.iter().map(|q| summary.quantile(*q)).collect();
        assert_non_decreasing(&from_histogram);
        assert_non_decreasing(&from_summary);
    }

    #[test]
    fn test_cardinality_ceiling_accepts_min_of_attempts_and_limit() {
        for (attempts, limit) in [(5usize, 10usize), (10, 10), (25, 10), (3, 1)] {
            let tracker = CardinalityTracker::new(limit);
            let label_sets: Vec<Labels> = (0..attempts)
                .map(|i| Labels::from([("id".to_string(), i.to_string())]))
                .collect();

            let accepted = label_sets
                .iter()
                .filter(|labels| tracker.record("series", labels).is_ok())
                .count();
            assert_eq!(accepted, attempts.min(limit));
            assert_eq!(tracker.current(), attempts.min(limit));

            for labels in label_sets.iter().take(limit.min(attempts)) {
                assert!(tracker.check("series", labels));
            }
        }
    }

    #[test]
    fn test_exemplar_ring_never_exceeds_capacity() {
        for capacity in [1usize, 4, 10] {
            let store = ExemplarStore::new(capacity);
            for i in 0..capacity + 5 {
                store.add(Exemplar::new(i as f64, "trace", "span"));
            }
            assert_eq!(store.len(), capacity);
            assert_eq!(store.get_all().len(), capacity);
        }
    }

    #[test]
    fn test_summary_mean_matches_input() {
        let summary = Summary::new("s", MetricOptions::new().with_buffer_cap(16));
        for v in 1..=1000 {
            summary.observe(v as f64);
        }
        assert_eq!(summary.count(), 1000);
        assert_approx_eq!(summary.mean(), 500.5);
        assert_eq!(summary.min(), Some(985.0));
        assert_eq!(summary.max(), Some(1000.0));
    }
}
