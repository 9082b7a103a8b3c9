//! Tests for label governance

use super::*;
use crate::monitoring::metrics::Labels;
use crate::utils::error::MetricsError;

fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn strict() -> LabelGovernor {
    LabelGovernor::new(LabelPolicy {
        max_labels: 3,
        max_key_length: 8,
        max_value_length: 6,
        auto_sanitize: false,
    })
}

fn lenient() -> LabelGovernor {
    LabelGovernor::new(LabelPolicy {
        auto_sanitize: true,
        ..strict().policy().clone()
    })
}

// ==================== Validation Tests ====================

#[test]
fn test_valid_labels_pass_through() {
    let input = labels(&[("method", "GET"), ("_code", "200")]);
    assert_eq!(strict().validate_and_sanitize_tags(&input).unwrap(), input);
}

#[test]
fn test_key_rules() {
    let governor = strict();
    let reason = |key: &str| governor.validate_key(key).unwrap_err().reason;

    assert_eq!(reason(""), LabelErrorReason::EmptyKey);
    assert_eq!(reason("abcdefghi"), LabelErrorReason::KeyTooLong { max: 8 });
    assert_eq!(reason("9lives"), LabelErrorReason::InvalidKeyStart);
    assert_eq!(reason("a-b"), LabelErrorReason::InvalidKeyCharacter('-'));
    for key in ["job", "instance", "le", "quantile", "__name__", "__meta"] {
        assert_eq!(reason(key), LabelErrorReason::ReservedKey, "{key}");
    }
}

#[test]
fn test_value_rules() {
    let governor = strict();
    let err = governor.validate_value("path", "toolong!").unwrap_err();
    assert_eq!(err.reason, LabelErrorReason::ValueTooLong { max: 6 });
    assert_eq!(err.label, "path");
    assert_eq!(err.value, "toolong!");

    let err = governor.validate_value("path", "a\nb").unwrap_err();
    assert_eq!(err.reason, LabelErrorReason::ControlCharacter);
}

#[test]
fn test_too_many_labels() {
    let input = labels(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
    let err = lenient().validate_and_sanitize_tags(&input).unwrap_err();
    assert_eq!(err.reason, LabelErrorReason::TooManyLabels { count: 4, max: 3 });
}

#[test]
fn test_strict_mode_rejects_instead_of_fixing() {
    let input = labels(&[("http-code", "200")]);
    let err = strict().validate_and_sanitize_tags(&input).unwrap_err();
    assert_eq!(err.reason, LabelErrorReason::InvalidKeyCharacter('-'));
}

// ==================== Sanitization Tests ====================

#[test]
fn test_sanitize_key() {
    let governor = strict();
    assert_eq!(governor.sanitize_label_key("http-code"), "http_cod");
    assert_eq!(governor.sanitize_label_key("2xx"), "_2xx");
    assert_eq!(governor.sanitize_label_key(""), "_");
    assert_eq!(governor.sanitize_label_key("a.b c"), "a_b_c");
}

#[test]
fn test_sanitize_value() {
    let governor = strict();
    assert_eq!(governor.sanitize_label_value("a\tb"), "a_b");
    assert_eq!(governor.sanitize_label_value("abcdefgh"), "abcdef");
    assert_eq!(governor.sanitize_label_value("ünï"), "ünï");
}

#[test]
fn test_auto_sanitize_corrects_labels() {
    let input = labels(&[("2xx", "line\nbreak"), ("ok", "v")]);
    let clean = lenient().validate_and_sanitize_tags(&input).unwrap();
    assert_eq!(clean.get("_2xx").map(String::as_str), Some("line_b"));
    assert_eq!(clean.get("ok").map(String::as_str), Some("v"));
}

#[test]
fn test_auto_sanitize_never_fixes_reserved_keys() {
    let input = labels(&[("instance", "host-1")]);
    let err = lenient().validate_and_sanitize_tags(&input).unwrap_err();
    assert_eq!(err.reason, LabelErrorReason::ReservedKey);
}

// ==================== Cardinality Tests ====================

#[test]
fn test_cardinality_ceiling() {
    let tracker = CardinalityTracker::new(3);
    let attempts: Vec<Labels> = (0..10)
        .map(|i| labels(&[("user", &i.to_string())]))
        .collect();

    let accepted = attempts
        .iter()
        .filter(|l| tracker.record("logins", l).is_ok())
        .count();
    assert_eq!(accepted, 3);
    assert_eq!(tracker.current(), 3);
    assert_eq!(tracker.overflow_count(), 7);

    // grandfathered series stay valid
    for l in attempts.iter().take(3) {
        assert!(tracker.check("logins", l));
        assert!(tracker.record("logins", l).is_ok());
    }
    assert!(!tracker.check("logins", &attempts[5]));
}

#[test]
fn test_cardinality_key_is_order_independent() {
    let tracker = CardinalityTracker::new(1);
    let mut first = Labels::new();
    first.insert("b".to_string(), "2".to_string());
    first.insert("a".to_string(), "1".to_string());
    let second = labels(&[("a", "1"), ("b", "2")]);

    tracker.record("m", &first).unwrap();
    assert!(tracker.record("m", &second).is_ok());
    assert!(matches!(
        tracker.record("other", &second),
        Err(MetricsError::CardinalityLimitExceeded { limit: 1, .. })
    ));
}

#[test]
fn test_cardinality_separator_characters_in_values() {
    let tracker = CardinalityTracker::new(10);
    let joined = labels(&[("a", "1,b=2")]);
    let split = labels(&[("a", "1"), ("b", "2")]);

    tracker.record("m", &joined).unwrap();
    assert!(!tracker.contains("m", &split));

    tracker.record("m", &split).unwrap();
    assert_eq!(tracker.current(), 2);
}

#[test]
fn test_cardinality_limit_change() {
    let tracker = CardinalityTracker::new(1);
    tracker.record("a", &Labels::new()).unwrap();
    assert!(tracker.record("b", &Labels::new()).is_err());

    tracker.set_limit(2);
    assert!(tracker.record("b", &Labels::new()).is_ok());

    tracker.set_limit(1);
    assert!(tracker.contains("a", &Labels::new()));
    assert!(tracker.record("b", &Labels::new()).is_ok());
    assert!(tracker.record("c", &Labels::new()).is_err());
}
