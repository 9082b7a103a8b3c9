//! Tests for error handling

#[cfg(test)]
mod tests {
    use super::super::types::MetricsError;
    use crate::monitoring::governance::{LabelError, LabelErrorReason};
    use crate::monitoring::metrics::MetricType;

    #[test]
    fn test_error_creation() {
        let error = MetricsError::config("bad namespace");
        assert!(matches!(error, MetricsError::Config(msg) if msg == "bad namespace"));

        let error = MetricsError::invalid_snapshot("empty name");
        assert!(matches!(error, MetricsError::InvalidSnapshot { reason } if reason == "empty name"));
    }

    #[test]
    fn test_collection_helper() {
        let error = MetricsError::collection("db", "connection refused");
        assert_eq!(
            error.to_string(),
            "Collection from 'db' failed: connection refused"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let error = MetricsError::TypeMismatch {
            name: "http_requests".to_string(),
            existing: MetricType::Counter,
            requested: MetricType::Gauge,
        };
        assert_eq!(
            error.to_string(),
            "Metric 'http_requests' is registered as counter, requested as gauge"
        );
    }

    #[test]
    fn test_label_error_is_transparent() {
        let label_error = LabelError::new("1abc", LabelErrorReason::InvalidKeyStart, "v");
        let expected = label_error.to_string();
        let error: MetricsError = label_error.into();
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(MetricsError::PushBufferFull.is_recoverable());
        assert!(MetricsError::NotStarted("b".to_string()).is_recoverable());
        assert!(!MetricsError::MetricNotFound("x".to_string()).is_recoverable());
    }
}
